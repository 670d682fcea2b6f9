use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::TeamId;

const SOURCE_URL: &str =
    "https://docs.google.com/spreadsheets/d/1hLteGvuivpi-l5mZYowghWjB-vbILK2JnStf0IN6lfc";

const DEST_URL: &str =
    "https://docs.google.com/spreadsheets/d/1fZKnEYJ9gxAZBEZCHDeK5UO69AdiRVisd89ltNaNd10";

/// Sign-up window closes at 2022-02-01 00:00:00 UTC.
const CUTOFF_UNIX: i64 = 1_643_644_800;

/// Immutable label ↔ canonical-id lookup, built once at startup and passed
/// explicitly. Labels not present here classify as `TeamId::Other`.
#[derive(Debug, Clone)]
pub struct TeamMapping {
    by_label: HashMap<String, TeamId>,
    titles: HashMap<TeamId, String>,
}

impl TeamMapping {
    pub fn new(pairs: &[(&str, TeamId)]) -> Self {
        let by_label = pairs
            .iter()
            .map(|&(label, id)| (label.to_owned(), id))
            .collect();
        let titles = pairs
            .iter()
            .map(|&(label, id)| (id, label.to_owned()))
            .collect();
        Self { by_label, titles }
    }

    pub fn classify(&self, label: &str) -> TeamId {
        self.by_label.get(label).copied().unwrap_or(TeamId::Other)
    }

    pub fn sheet_title(&self, id: TeamId) -> &str {
        self.titles
            .get(&id)
            .map(String::as_str)
            .unwrap_or(TeamId::Other.key())
    }
}

impl Default for TeamMapping {
    fn default() -> Self {
        Self::new(&[
            ("Media & Publicity Team", TeamId::Media),
            ("AV Team", TeamId::Tech),
            ("Connect Team (SST .. & more!)", TeamId::Connect),
            ("Emcee Team", TeamId::Emcee),
            ("Outreach Team", TeamId::Outreach),
            ("Assistant Cell Group Leader", TeamId::Acgl),
            ("Worship Team", TeamId::Worship),
            ("Other", TeamId::Other),
        ])
    }
}

/// Fixed deployment constants; nothing is read from flags or the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source_url: String,
    pub dest_url: String,
    /// Sleep between successful update cycles.
    pub poll_interval: Duration,
    /// Hard deadline; reaching it is a clean shutdown.
    pub cutoff: DateTime<Utc>,
    pub max_consecutive_errors: u32,
    pub teams: TeamMapping,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: SOURCE_URL.to_owned(),
            dest_url: DEST_URL.to_owned(),
            poll_interval: Duration::from_secs(3600),
            cutoff: DateTime::from_timestamp(CUTOFF_UNIX, 0)
                .expect("cutoff constant is a valid timestamp"),
            max_consecutive_errors: 5,
            teams: TeamMapping::default(),
        }
    }
}
