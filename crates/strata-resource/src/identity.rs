use md5::{Digest, Md5};
use uuid::Uuid;

/// Derives a child's stable identity from its owning Plan's uuid, the
/// child's adapter class tag, and its path segment:
/// `MD5("<parent_uuid>.<child_class_name>.<path_segment>")` reinterpreted
/// as a 128-bit UUID. Deterministic across runs for the same declarative
/// program — the same tree of `init_resources` calls always assigns the
/// same uuids.
pub fn sub_uuid(parent_uuid: Uuid, child_class_tag: &str, path_segment: &str) -> Uuid {
    let key = format!("{parent_uuid}.{child_class_tag}.{path_segment}");
    let digest = Md5::digest(key.as_bytes());
    Uuid::from_bytes(digest.into())
}

/// Joins a parent path with a child's path segment. The root Resource's
/// path is `"$"`.
pub fn join_path(parent_path: &str, segment: &str) -> String {
    format!("{parent_path}.{segment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let parent = Uuid::new_v4();
        let a = sub_uuid(parent, "demo.Vpc", "main_vpc");
        let b = sub_uuid(parent, "demo.Vpc", "main_vpc");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_path_segment_yields_differing_uuid() {
        let parent = Uuid::new_v4();
        let a = sub_uuid(parent, "demo.Vpc", "main_vpc");
        let b = sub_uuid(parent, "demo.Vpc", "secondary_vpc");
        assert_ne!(a, b);
    }

    #[test]
    fn join_path_builds_dotted_position() {
        assert_eq!(join_path("$", "main_vpc"), "$.main_vpc");
        assert_eq!(join_path("$.main_vpc", "public_subnet"), "$.main_vpc.public_subnet");
    }
}
