//! Ownership partitioning of a resource list.
use crate::model::UserResource;

/// Resources split by whether the current principal owns them. Relative
/// order within each group matches the input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipPartition {
    pub mine: Vec<UserResource>,
    pub others: Vec<UserResource>,
}

/// Splits `resources` into the current principal's resources and everyone
/// else's.
///
/// With no resolvable principal everything lands in `others`; an unknown
/// caller owns nothing rather than causing an error. The result is a pure
/// function of the inputs and is recomputed wholesale on every change.
pub fn partition_by_owner(
    resources: &[UserResource],
    principal_id: Option<&str>,
) -> OwnershipPartition {
    let Some(principal_id) = principal_id else {
        return OwnershipPartition {
            mine: Vec::new(),
            others: resources.to_vec(),
        };
    };
    let mut partition = OwnershipPartition::default();
    for resource in resources {
        if resource.owner_id == principal_id {
            partition.mine.push(resource.clone());
        } else {
            partition.others.push(resource.clone());
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeploymentStatus, ResourceProperties};

    fn resource(id: &str, owner: &str) -> UserResource {
        UserResource {
            id: id.to_string(),
            owner_id: owner.to_string(),
            template_name: "guacamole-vm".to_string(),
            deployment_status: DeploymentStatus::Deployed,
            is_enabled: true,
            properties: ResourceProperties::default(),
        }
    }

    #[test]
    fn partition_is_exhaustive_disjoint_and_order_preserving() {
        let resources = vec![
            resource("a", "me"),
            resource("b", "other-1"),
            resource("c", "me"),
            resource("d", "other-2"),
        ];
        let partition = partition_by_owner(&resources, Some("me"));

        let mine: Vec<&str> = partition.mine.iter().map(|r| r.id.as_str()).collect();
        let others: Vec<&str> = partition.others.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(mine, ["a", "c"]);
        assert_eq!(others, ["b", "d"]);
        assert_eq!(partition.mine.len() + partition.others.len(), resources.len());
        for resource in &partition.mine {
            assert!(!partition.others.iter().any(|r| r.id == resource.id));
        }
    }

    #[test]
    fn unresolvable_principal_owns_nothing() {
        let resources = vec![resource("a", "u1"), resource("b", "u2")];
        let partition = partition_by_owner(&resources, None);
        assert!(partition.mine.is_empty());
        assert_eq!(partition.others.len(), 2);
        let others: Vec<&str> = partition.others.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(others, ["a", "b"]);
    }

    #[test]
    fn principal_absent_from_list_yields_empty_mine() {
        let resources = vec![resource("a", "u1")];
        let partition = partition_by_owner(&resources, Some("stranger"));
        assert!(partition.mine.is_empty());
        assert_eq!(partition.others.len(), 1);
    }
}
