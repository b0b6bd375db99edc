use serde_json::{json, Value};

/// Minimal built-in collection served when the primary source cannot be read.
///
/// Uses the legacy `parentId`/`children` encoding on purpose so the fallback path goes through
/// the same normalization as loaded data.
pub fn seed_records() -> Vec<Value> {
    vec![
        json!({
            "id": "D-001", "title": "Договор №123", "type": "Договор аренды",
            "status": "Действует", "version": "1.0", "date": "2025-09-01",
            "author": "Иван Иванов", "counterparty": "ООО Ромашка",
            "projectNumber": "PRJ-2025-001",
            "parentId": null, "children": ["D-001-1", "D-001-A"]
        }),
        json!({
            "id": "D-001-1", "title": "Доп. соглашение №1", "type": "Доп. соглашение",
            "status": "Подписан", "version": "1.0", "date": "2025-09-03",
            "author": null, "counterparty": null, "projectNumber": null,
            "parentId": "D-001", "children": []
        }),
        json!({
            "id": "D-001-A", "title": "Приложение А", "type": "Приложение",
            "status": "Черновик", "version": "0.3", "date": "2025-09-04",
            "author": null, "counterparty": null, "projectNumber": null,
            "parentId": "D-001", "children": []
        }),
        json!({
            "id": "D-002", "title": "Договор поставки №456", "type": "Договор поставки",
            "status": "В работе", "version": "2.0", "date": "2025-08-15",
            "author": "Петр Петров", "counterparty": "ООО Василек",
            "projectNumber": "PRJ-2025-002",
            "parentId": null, "children": ["D-002-1"]
        }),
        json!({
            "id": "D-002-1", "title": "Спецификация №1", "type": "Приложение",
            "status": "Подписан", "version": "1.0", "date": "2025-08-20",
            "author": null, "counterparty": null, "projectNumber": null,
            "parentId": "D-002", "children": []
        }),
        json!({
            "id": "D-003", "title": "Соглашение о конфиденциальности", "type": "NDA",
            "status": "Действует", "version": "1.0", "date": "2025-07-10",
            "author": "Анна Смирнова", "counterparty": "ЗАО Ландыш",
            "projectNumber": "PRJ-2025-003",
            "parentId": null, "children": []
        }),
    ]
}
