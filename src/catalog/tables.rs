use redb::TableDefinition;

/// Object records: object resource name -> ObjectRecord (msgpack)
pub const OBJECTS: TableDefinition<&str, &[u8]> = TableDefinition::new("objects");
