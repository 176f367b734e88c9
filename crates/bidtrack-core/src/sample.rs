//! Canned sample data for offline mode and demos.

use chrono::NaiveDate;

use crate::models::{Company, EstimatorDraft, JobDraft, JobStatus};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Seed estimator rosters for both companies.
pub fn sample_estimators() -> Vec<EstimatorDraft> {
    let mhc = ["John Smith", "Sarah Johnson", "Mike Wilson", "Lisa Chen"];
    let hdd = [
        "David Rodriguez",
        "Emily Thompson",
        "James Martinez",
        "Anna Foster",
    ];

    mhc.iter()
        .map(|name| EstimatorDraft::new(*name, Company::Mhc))
        .chain(hdd.iter().map(|name| EstimatorDraft::new(*name, Company::Hdd)))
        .collect()
}

/// Seed jobs for both companies.
pub fn sample_jobs() -> Vec<JobDraft> {
    vec![
        JobDraft {
            location: Some("Phoenix, AZ".into()),
            estimator: Some("John Smith".into()),
            deadline: date(2025, 1, 15),
            follow_up_date: date(2025, 1, 12),
            status: JobStatus::InProgress,
            description: Some(
                "Large-scale commercial office building with underground parking and retail space."
                    .into(),
            ),
            estimating_cost: 45_000.0,
            bid_amount: 2_500_000.0,
            bond_amount: 125_000.0,
            ..JobDraft::new("Downtown Office Complex", "Metro Development Corp", Company::Mhc)
        },
        JobDraft {
            location: Some("Scottsdale, AZ".into()),
            estimator: Some("Sarah Johnson".into()),
            deadline: date(2025, 1, 20),
            follow_up_date: date(2025, 1, 25),
            status: JobStatus::Submitted,
            description: Some(
                "45 single-family homes with community amenities and landscaping.".into(),
            ),
            estimating_cost: 35_000.0,
            bid_amount: 1_800_000.0,
            bond_amount: 90_000.0,
            ..JobDraft::new(
                "Residential Subdivision Phase 2",
                "Desert Homes LLC",
                Company::Mhc,
            )
        },
        JobDraft {
            location: Some("Tempe, AZ".into()),
            estimator: Some("Mike Wilson".into()),
            deadline: date(2025, 1, 10),
            follow_up_date: date(2025, 1, 13),
            status: JobStatus::FollowUpRequired,
            description: Some(
                "Infrastructure repair and reinforcement of aging bridge structure.".into(),
            ),
            estimating_cost: 25_000.0,
            bid_amount: 850_000.0,
            bond_amount: 42_500.0,
            ..JobDraft::new(
                "Highway 101 Bridge Repair",
                "Arizona Department of Transportation",
                Company::Mhc,
            )
        },
        JobDraft {
            location: Some("Mesa, AZ".into()),
            estimator: Some("David Rodriguez".into()),
            deadline: date(2025, 1, 18),
            follow_up_date: date(2025, 1, 22),
            status: JobStatus::InProgress,
            description: Some(
                "Complete drywall installation for 50,000 sq ft office complex.".into(),
            ),
            estimating_cost: 8_000.0,
            bid_amount: 125_000.0,
            bond_amount: 6_250.0,
            ..JobDraft::new(
                "Commercial Drywall Installation",
                "Valley Business Center",
                Company::Hdd,
            )
        },
        JobDraft {
            location: Some("Paradise Valley, AZ".into()),
            estimator: Some("Emily Thompson".into()),
            deadline: date(2025, 1, 25),
            follow_up_date: date(2025, 1, 30),
            status: JobStatus::Submitted,
            description: Some(
                "High-end residential drywall with custom textures and specialty finishes.".into(),
            ),
            estimating_cost: 5_000.0,
            bid_amount: 75_000.0,
            bond_amount: 3_750.0,
            ..JobDraft::new("Luxury Home Drywall Package", "Pinnacle Custom Homes", Company::Hdd)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_is_valid() {
        for draft in sample_jobs() {
            assert!(draft.validate().is_ok(), "invalid sample job: {}", draft.title);
        }
        for draft in sample_estimators() {
            assert!(draft.validate().is_ok());
        }
    }

    #[test]
    fn test_sample_data_covers_both_companies() {
        let jobs = sample_jobs();
        assert!(jobs.iter().any(|j| j.company == Company::Mhc));
        assert!(jobs.iter().any(|j| j.company == Company::Hdd));
        assert_eq!(jobs.len(), 5);
        assert_eq!(sample_estimators().len(), 8);
    }
}
