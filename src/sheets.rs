use tracing::info;

use crate::config::AppConfig;
use crate::models::SignupRecord;
use crate::normalize;
use crate::partition;
use crate::store::{DocumentStore, StoreError};

pub const COLUMN_TITLES: [&str; 12] = [
    "No.",
    "Full Name",
    "HP Contact",
    "Email",
    "Team",
    "CGL",
    "Age Group / Zone",
    "Has Experience?",
    "Experience Description",
    "Why Serve?",
    "Questions",
    "Timestamp",
];

/// First data row; rows 1 and 2 hold the header block.
pub const DATA_START_ROW: usize = 3;

const SOURCE_WORKSHEET: usize = 0;

const NEW_SHEET_ROWS: u32 = 100;
const NEW_SHEET_COLS: u32 = 20;

/// Two-row header written once, when a destination sheet is first created.
pub fn header_block(title: &str) -> Vec<Vec<String>> {
    let mut banner = vec![String::new(); COLUMN_TITLES.len()];
    banner[0] = title.to_owned();
    let names = COLUMN_TITLES.iter().map(|s| s.to_string()).collect();
    vec![banner, names]
}

// seq is the 1-based position within the bucket.
pub fn data_row(seq: usize, signup: &SignupRecord) -> Vec<String> {
    vec![
        seq.to_string(),
        signup.full_name.clone(),
        signup.contact_hp.clone(),
        signup.contact_email.clone(),
        signup.ministry.clone(),
        signup.cgl.clone(),
        signup.zone.clone(),
        signup.experience.clone(),
        signup.experience_desc.clone(),
        signup.reason.clone(),
        signup.questions.clone(),
        signup.timestamp.clone(),
    ]
}

pub struct CycleSummary {
    pub records: usize,
    pub buckets: usize,
}

/// One complete read-classify-sort-write pass. Every bucket is rebuilt from
/// scratch and every data region overwritten, so running it twice over
/// unchanged input produces identical output.
pub async fn run_cycle<S>(store: &S, config: &AppConfig) -> Result<CycleSummary, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let rows = store.read_rows(&config.source_url, SOURCE_WORKSHEET).await?;
    let records = normalize::normalize_rows(rows);
    let buckets = partition::partition(&records, &config.teams);

    let titles = store.sheet_titles(&config.dest_url).await?;
    for bucket in &buckets {
        let title = config.teams.sheet_title(bucket.id);
        info!(
            team = bucket.id.key(),
            signups = bucket.signups.len(),
            "updating destination sheet"
        );

        if !titles.iter().any(|t| t == title) {
            store
                .create_sheet(&config.dest_url, title, NEW_SHEET_ROWS, NEW_SHEET_COLS)
                .await?;
            store
                .write_range(&config.dest_url, title, 1, &header_block(title))
                .await?;
        }

        let data: Vec<Vec<String>> = bucket
            .signups
            .iter()
            .enumerate()
            .map(|(i, signup)| data_row(i + 1, signup))
            .collect();
        store
            .replace_data(&config.dest_url, title, DATA_START_ROW, &data)
            .await?;
        store
            .autofit_columns(&config.dest_url, title, 0, COLUMN_TITLES.len())
            .await?;
    }

    Ok(CycleSummary {
        records: records.len(),
        buckets: buckets.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamId;
    use crate::store::mock::MockConnector;
    use crate::store::CredentialProvider;

    const SOURCE: &str = "https://docs.google.com/spreadsheets/d/source";
    const DEST: &str = "https://docs.google.com/spreadsheets/d/dest";

    fn owned(row: &[&str]) -> Vec<String> {
        row.iter().map(|s| s.to_string()).collect()
    }

    fn test_config() -> AppConfig {
        AppConfig {
            source_url: SOURCE.to_owned(),
            dest_url: DEST.to_owned(),
            ..AppConfig::default()
        }
    }

    fn response_header() -> Vec<String> {
        owned(&[
            "Timestamp",
            "Full Name",
            "HP Contact",
            "Email",
            "CGL",
            "Zone",
            "Ministry",
            "Experience?",
            "ExpDesc",
            "Reason",
            "Questions",
        ])
    }

    fn signup_row(name: &str, zone: &str, ministry: &str) -> Vec<String> {
        owned(&[
            "01/01/2022 10:00:00",
            name,
            "91234567",
            "a@b.com",
            "CGL1",
            zone,
            ministry,
            "Yes",
            "desc",
            "reason",
            "",
        ])
    }

    fn seeded(rows: Vec<Vec<String>>) -> MockConnector {
        let mock = MockConnector::new();
        mock.set_source_rows(SOURCE, rows);
        mock.add_doc(DEST);
        mock
    }

    #[tokio::test]
    async fn single_signup_lands_in_its_team_sheet() {
        // Short row: the empty questions answer is omitted by the form.
        let mock = seeded(vec![
            response_header(),
            owned(&[
                "01/01/2022 10:00:00",
                "Tan Wei",
                "91234567",
                "a@b.com",
                "CGL1",
                "Zone A",
                "AV Team",
                "Yes",
                "desc",
                "reason",
            ]),
        ]);
        let store = mock.acquire().await.unwrap();

        let summary = run_cycle(&store, &test_config()).await.unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.buckets, TeamId::ALL.len());

        let grid = mock.grid(DEST, "AV Team").unwrap();
        assert_eq!(grid[0][0], "AV Team");
        assert_eq!(grid[1], owned(&COLUMN_TITLES));
        assert_eq!(
            grid[2],
            owned(&[
                "1",
                "Tan Wei",
                "91234567",
                "a@b.com",
                "AV Team",
                "CGL1",
                "Zone A",
                "Yes",
                "desc",
                "reason",
                "",
                "01/01/2022 10:00:00",
            ])
        );
    }

    #[tokio::test]
    async fn first_cycle_creates_every_destination_sheet_once() {
        let mock = seeded(vec![response_header()]);
        let store = mock.acquire().await.unwrap();
        let config = test_config();

        run_cycle(&store, &config).await.unwrap();
        assert_eq!(mock.created_sheets() as usize, TeamId::ALL.len());
        for id in TeamId::ALL {
            let title = config.teams.sheet_title(id).to_owned();
            assert!(mock.titles(DEST).contains(&title));
        }

        // Second cycle finds the sheets and must not recreate them.
        run_cycle(&store, &config).await.unwrap();
        assert_eq!(mock.created_sheets() as usize, TeamId::ALL.len());
    }

    #[tokio::test]
    async fn cycles_over_unchanged_input_are_idempotent() {
        let mock = seeded(vec![
            response_header(),
            signup_row("Tan Wei", "Zone A", "AV Team, Worship Team"),
            signup_row("Amos", "Zone B", "Emcee Team"),
        ]);
        let store = mock.acquire().await.unwrap();
        let config = test_config();

        run_cycle(&store, &config).await.unwrap();
        let first: Vec<_> = TeamId::ALL
            .iter()
            .map(|&id| mock.grid(DEST, config.teams.sheet_title(id)).unwrap())
            .collect();

        run_cycle(&store, &config).await.unwrap();
        let second: Vec<_> = TeamId::ALL
            .iter()
            .map(|&id| mock.grid(DEST, config.teams.sheet_title(id)).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn shrinking_cycle_leaves_no_stale_rows() {
        let mut rows = vec![response_header()];
        for i in 0..5 {
            rows.push(signup_row(&format!("Person {i}"), "Zone A", "AV Team"));
        }
        let mock = seeded(rows);
        let store = mock.acquire().await.unwrap();
        let config = test_config();

        run_cycle(&store, &config).await.unwrap();
        assert_eq!(mock.grid(DEST, "AV Team").unwrap().len(), DATA_START_ROW - 1 + 5);

        // Every signup withdrawn: the next cycle writes a zero-row block.
        mock.set_source_rows(SOURCE, vec![response_header()]);
        run_cycle(&store, &config).await.unwrap();
        let grid = mock.grid(DEST, "AV Team").unwrap();
        assert_eq!(grid.len(), DATA_START_ROW - 1);
        assert_eq!(grid[1], owned(&COLUMN_TITLES));
    }

    #[tokio::test]
    async fn data_rows_are_sorted_and_renumbered() {
        let mock = seeded(vec![
            response_header(),
            signup_row("Zi Xuan", "Zone B", "AV Team"),
            signup_row("Amos", "Zone A", "AV Team"),
        ]);
        let store = mock.acquire().await.unwrap();

        run_cycle(&store, &test_config()).await.unwrap();
        let grid = mock.grid(DEST, "AV Team").unwrap();
        assert_eq!(grid[2][0], "1");
        assert_eq!(grid[2][1], "Amos");
        assert_eq!(grid[3][0], "2");
        assert_eq!(grid[3][1], "Zi Xuan");
    }
}
