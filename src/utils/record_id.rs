use surrealdb::RecordId;

/// Builds a `RecordId` from a path segment. Accepts either a bare key
/// (`abc123`) or a full `table:key` reference; a mismatched table prefix is
/// treated as a bare key so ids never silently cross tables.
pub fn record_id(table: &str, raw: &str) -> RecordId {
    let raw = raw.trim();
    match raw.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, raw),
    }
}
