/// Maps a human-readable check name to a store key.
///
/// Store names must be lowercase DNS subdomains
/// (`[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*`).
/// Only case and spaces are normalized; other characters pass through and
/// the store rejects them if they are not allowed.
pub fn sanitize_resource_name(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "-")
}
