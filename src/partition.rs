use crate::config::TeamMapping;
use crate::models::{SignupRecord, TeamId};

pub struct Bucket<'a> {
    pub id: TeamId,
    pub signups: Vec<&'a SignupRecord>,
}

/// One id per selected name, so a record fans out to N buckets; unknown
/// names yield the catch-all rather than an error.
pub fn classify(record: &SignupRecord, teams: &TeamMapping) -> Vec<TeamId> {
    record
        .teams
        .iter()
        .map(|label| teams.classify(label))
        .collect()
}

/// Fans records out into one bucket per id (`TeamId::ALL` order), then sorts
/// each bucket by (zone, full name); the sort is stable, so equal keys keep
/// their arrival order.
pub fn partition<'a>(records: &'a [SignupRecord], teams: &TeamMapping) -> Vec<Bucket<'a>> {
    let mut buckets: Vec<Bucket<'a>> = TeamId::ALL
        .iter()
        .map(|&id| Bucket {
            id,
            signups: Vec::new(),
        })
        .collect();

    for record in records {
        for id in classify(record, teams) {
            buckets[id.index()].signups.push(record);
        }
    }

    for bucket in &mut buckets {
        bucket
            .signups
            .sort_by(|a, b| a.zone.cmp(&b.zone).then_with(|| a.full_name.cmp(&b.full_name)));
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FIELD_COUNT;

    fn record(name: &str, zone: &str, ministry: &str) -> SignupRecord {
        let mut fields: [String; FIELD_COUNT] = Default::default();
        fields[1] = name.to_owned();
        fields[5] = zone.to_owned();
        fields[6] = ministry.to_owned();
        SignupRecord::from_fields(fields)
    }

    fn names<'a>(bucket: &'a Bucket<'a>) -> Vec<&'a str> {
        bucket.signups.iter().map(|s| s.full_name.as_str()).collect()
    }

    #[test]
    fn multi_select_fans_out_to_every_named_bucket() {
        let teams = TeamMapping::default();
        let records = vec![record("Tan Wei", "Zone A", "AV Team, Worship Team, Nope Team")];
        let buckets = partition(&records, &teams);
        let memberships: usize = buckets.iter().map(|b| b.signups.len()).sum();
        // two separators, three names, three bucket memberships
        assert_eq!(memberships, 3);
        assert_eq!(buckets[TeamId::Tech.index()].signups.len(), 1);
        assert_eq!(buckets[TeamId::Worship.index()].signups.len(), 1);
        assert_eq!(buckets[TeamId::Other.index()].signups.len(), 1);
    }

    #[test]
    fn unknown_names_route_silently_to_catch_all() {
        let teams = TeamMapping::default();
        let ids = classify(&record("x", "z", "Misspelt Team"), &teams);
        assert_eq!(ids, vec![TeamId::Other]);
    }

    #[test]
    fn every_bucket_exists_even_when_empty() {
        let teams = TeamMapping::default();
        let buckets = partition(&[], &teams);
        assert_eq!(buckets.len(), TeamId::ALL.len());
        for (bucket, id) in buckets.iter().zip(TeamId::ALL) {
            assert_eq!(bucket.id, id);
            assert!(bucket.signups.is_empty());
        }
    }

    #[test]
    fn buckets_sort_by_zone_then_name() {
        let teams = TeamMapping::default();
        let records = vec![
            record("Zi Xuan", "Zone B", "AV Team"),
            record("Amos", "Zone B", "AV Team"),
            record("Ben", "Zone A", "AV Team"),
        ];
        let buckets = partition(&records, &teams);
        assert_eq!(names(&buckets[TeamId::Tech.index()]), vec!["Ben", "Amos", "Zi Xuan"]);
    }

    #[test]
    fn equal_keys_keep_arrival_order() {
        let teams = TeamMapping::default();
        let mut first = record("Tan Wei", "Zone A", "AV Team");
        first.contact_hp = "111".to_owned();
        let mut second = record("Tan Wei", "Zone A", "AV Team");
        second.contact_hp = "222".to_owned();
        let records = vec![first, second];
        let buckets = partition(&records, &teams);
        let tech = &buckets[TeamId::Tech.index()];
        assert_eq!(tech.signups[0].contact_hp, "111");
        assert_eq!(tech.signups[1].contact_hp, "222");
    }

    #[test]
    fn duplicate_selection_appears_twice_in_one_bucket() {
        let teams = TeamMapping::default();
        let records = vec![record("Tan Wei", "Zone A", "AV Team, AV Team")];
        let buckets = partition(&records, &teams);
        assert_eq!(buckets[TeamId::Tech.index()].signups.len(), 2);
    }
}
