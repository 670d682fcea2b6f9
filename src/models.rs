pub const FIELD_COUNT: usize = 11;

/// Literal separator the form inserts between multi-select team choices.
pub const TEAM_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRecord {
    pub timestamp: String,
    pub full_name: String,
    pub contact_hp: String,
    pub contact_email: String,
    pub cgl: String,
    pub zone: String,
    /// Raw team-selection string exactly as submitted.
    pub ministry: String,
    pub experience: String,
    pub experience_desc: String,
    pub reason: String,
    pub questions: String,
    /// The ministry string split on `", "`; duplicates deliberately kept.
    pub teams: Vec<String>,
}

impl SignupRecord {
    pub fn from_fields(fields: [String; FIELD_COUNT]) -> Self {
        let [timestamp, full_name, contact_hp, contact_email, cgl, zone, ministry, experience, experience_desc, reason, questions] =
            fields;
        let teams = ministry.split(TEAM_SEPARATOR).map(str::to_owned).collect();
        Self {
            timestamp,
            full_name,
            contact_hp,
            contact_email,
            cgl,
            zone,
            ministry,
            experience,
            experience_desc,
            reason,
            questions,
            teams,
        }
    }
}

/// Canonical ministry ids; `Other` is the catch-all for unmapped team names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamId {
    Media,
    Tech,
    Connect,
    Emcee,
    Outreach,
    Acgl,
    Worship,
    Other,
}

impl TeamId {
    /// Fixed order destination sheets are reconciled in.
    pub const ALL: [TeamId; 8] = [
        TeamId::Media,
        TeamId::Tech,
        TeamId::Connect,
        TeamId::Emcee,
        TeamId::Outreach,
        TeamId::Acgl,
        TeamId::Worship,
        TeamId::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TeamId::Media => "media",
            TeamId::Tech => "tech",
            TeamId::Connect => "connect",
            TeamId::Emcee => "emcee",
            TeamId::Outreach => "outreach",
            TeamId::Acgl => "acgl",
            TeamId::Worship => "worship",
            TeamId::Other => "Other",
        }
    }

    // Position in ALL; the variants declare in that order.
    pub fn index(self) -> usize {
        self as usize
    }
}
