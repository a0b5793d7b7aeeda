//! On-disk engine smoke test.
//! Run: cargo test -p comanda-server --test storage

use comanda_server::db::DbService;
use comanda_server::db::models::{DiningTableCreate, DiningTableUpdate};
use comanda_server::db::repository::DiningTableRepository;

#[tokio::test]
async fn rocksdb_engine_round_trips_records() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let service = DbService::open(tmp.path()).await.expect("open rocksdb");

    let repo = DiningTableRepository::new(service.db.clone());
    let created = repo
        .create(DiningTableCreate {
            table_number: 12,
            number_of_guests: 4,
        })
        .await
        .expect("create table");
    let id = created.id.expect("table id").to_string();

    let found = repo
        .find_by_id(&id)
        .await
        .expect("find table")
        .expect("table exists");
    assert_eq!(found.table_number, 12);
    assert_eq!(found.number_of_guests, 4);

    // Duplicate display number is rejected
    let duplicate = repo
        .create(DiningTableCreate {
            table_number: 12,
            number_of_guests: 2,
        })
        .await;
    assert!(duplicate.is_err());

    // Partial update keeps the untouched field
    let updated = repo
        .update(
            &id,
            DiningTableUpdate {
                table_number: None,
                number_of_guests: Some(6),
            },
        )
        .await
        .expect("update table");
    assert_eq!(updated.table_number, 12);
    assert_eq!(updated.number_of_guests, 6);
    assert!(updated.updated_at >= found.updated_at);
}
