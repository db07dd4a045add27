use crate::error::ContractError;
use crate::store::RecordStore;
use actix_web::{web, HttpResponse};
use common::model::contract::SignedContract;
use serde::Serialize;

/// One year-month bucket of stored contracts.
#[derive(Debug, Serialize)]
pub(crate) struct GroupSummary {
    pub key: String,
    pub count: usize,
}

/// `GET /api/export/groups` — the group keys with their contract counts,
/// newest period first.
pub(crate) async fn process(store: web::Data<RecordStore>) -> Result<HttpResponse, ContractError> {
    let contracts = store.list_contracts()?;
    let summaries: Vec<GroupSummary> = group_by_month(&contracts)
        .into_iter()
        .map(|(key, bucket)| GroupSummary {
            key,
            count: bucket.len(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// Partitions contracts into year-month buckets keyed by the `YYYY-MM`
/// prefix of the signing timestamp, newest period first. The key comes
/// straight off the stored local timestamp; it is not renormalized to UTC.
pub(crate) fn group_by_month(contracts: &[SignedContract]) -> Vec<(String, Vec<SignedContract>)> {
    let mut groups: Vec<(String, Vec<SignedContract>)> = Vec::new();
    for contract in contracts {
        let key = month_key(&contract.signed_at);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, bucket)) => bucket.push(contract.clone()),
            None => groups.push((key, vec![contract.clone()])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// `YYYY-MM` of a stored timestamp.
pub(crate) fn month_key(signed_at: &str) -> String {
    signed_at.chars().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::contract::ContractStatus;

    fn contract(id: &str, signed_at: &str) -> SignedContract {
        SignedContract {
            id: id.to_string(),
            template_id: "t-1".to_string(),
            template_name: "Membership Agreement".to_string(),
            signer_name: "Hong Gildong".to_string(),
            signer_phone: "010-1234-5678".to_string(),
            signer_email: "hong@x.com".to_string(),
            signed_at: signed_at.to_string(),
            document: None,
            status: ContractStatus::Sent,
        }
    }

    #[test]
    fn buckets_by_month_newest_period_first() {
        let contracts = vec![
            contract("a", "2024-05-02T10:00:00+09:00"),
            contract("b", "2024-06-15T10:00:00+09:00"),
            contract("c", "2024-05-20T18:30:00+09:00"),
        ];

        let groups = group_by_month(&contracts);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["2024-06", "2024-05"]);

        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[0].1[0].id, "b");
        let may_ids: Vec<&str> = groups[1].1.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(may_ids, vec!["a", "c"]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_month(&[]).is_empty());
    }

    #[test]
    fn key_is_the_local_display_month() {
        // The stored string already carries the local offset; the key is a
        // plain prefix, never a UTC conversion.
        assert_eq!(month_key("2024-05-31T23:30:00+09:00"), "2024-05");
    }
}
