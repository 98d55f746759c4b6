//! 记录转换工具

use bson::{Bson, Document};
use dao_ports::RecordId;

/// 将 `_id: ObjectId` 替换为 `id: <hex>`
///
/// `_id` 不是 ObjectId 时原样改名为 `id`；没有 `_id` 时不做改动。
pub fn clean_record_id(mut record: Document) -> Document {
    let Some(id) = record.remove("_id") else {
        return record;
    };

    let id = match id {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        other => other,
    };

    let mut cleaned = Document::new();
    cleaned.insert("id", id);
    cleaned.extend(record);
    cleaned
}

/// 记录的 `_id` 为 ObjectId 时返回对应的 [`RecordId`]
pub fn record_id_of(record: &Document) -> Option<RecordId> {
    match record.get("_id") {
        Some(Bson::ObjectId(oid)) => Some(RecordId::from(*oid)),
        _ => None,
    }
}
