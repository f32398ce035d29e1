//! Pathway selection
//!
//! A user commits to exactly three distinct pathways at once. Partial
//! selections only ever exist in the client; the stored set is either empty
//! or complete. Selecting never touches progress records, so reselecting a
//! pathway later brings its old progress back.

use std::collections::HashSet;

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Actor, SELECTION_SIZE};
use crate::store::{CatalogStore, UserStore};
use crate::{Error, Result};

/// Parse client-supplied pathway ids, rejecting malformed ones
pub fn parse_pathway_ids(raw: &[String]) -> Result<Vec<Uuid>> {
    raw.iter()
        .map(|s| {
            Uuid::parse_str(s.trim())
                .map_err(|_| Error::Validation(format!("invalid pathway id format: '{}'", s)))
        })
        .collect()
}

/// Commit `pathway_ids` as the actor's selection
///
/// Fails with `Validation` unless there are exactly three distinct ids that
/// all reference existing pathways. On success the stored set is overwritten.
pub async fn select_pathways(
    catalog: &dyn CatalogStore,
    users: &dyn UserStore,
    actor: &Actor,
    pathway_ids: &[Uuid],
) -> Result<()> {
    if pathway_ids.len() != SELECTION_SIZE {
        return Err(Error::Validation(format!(
            "please select exactly {} pathways (got {})",
            SELECTION_SIZE,
            pathway_ids.len()
        )));
    }

    let distinct: HashSet<&Uuid> = pathway_ids.iter().collect();
    if distinct.len() != pathway_ids.len() {
        return Err(Error::Validation("selected pathways must be distinct".to_string()));
    }

    for id in pathway_ids {
        if catalog.find_by_id(*id).await?.is_none() {
            return Err(Error::Validation(format!("pathway {} does not exist", id)));
        }
    }

    users
        .update_selected_pathways(actor.user_id, pathway_ids)
        .await?;

    info!(user = %actor.email, ?pathway_ids, "Saved selected pathways");
    Ok(())
}

/// The actor's stored selection; empty when none or when the user is gone
pub async fn selected_pathways(users: &dyn UserStore, actor: &Actor) -> Result<Vec<Uuid>> {
    match users.find_by_id(actor.user_id).await? {
        Some(user) => Ok(user.selected_pathways),
        None => {
            debug!(user_id = %actor.user_id, "User not found, returning empty selection");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pathway_ids() {
        let id = Uuid::new_v4();
        let parsed = parse_pathway_ids(&[id.to_string(), format!(" {} ", id)]).unwrap();
        assert_eq!(parsed, vec![id, id]);

        let err = parse_pathway_ids(&["not-an-id".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
