//! Order view composer tests against the embedded in-memory engine.
//! Run: cargo test -p comanda-server --test order_view

use comanda_server::db::DbService;
use comanda_server::db::models::{
    DiningTableCreate, FoodCreate, MenuCreate, OrderItemLine,
};
use comanda_server::db::repository::{
    DiningTableRepository, FoodRepository, MenuRepository, OrderItemRepository, OrderRepository,
};
use comanda_server::views::OrderViewComposer;
use std::time::Duration;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

struct Fixture {
    db: Surreal<Db>,
    composer: OrderViewComposer,
    menus: MenuRepository,
    foods: FoodRepository,
    tables: DiningTableRepository,
    orders: OrderRepository,
    items: OrderItemRepository,
}

async fn fixture() -> Fixture {
    let service = DbService::open_memory().await.expect("open memory db");
    let db = service.db;
    Fixture {
        composer: OrderViewComposer::new(db.clone(), Duration::from_secs(5)),
        menus: MenuRepository::new(db.clone()),
        foods: FoodRepository::new(db.clone()),
        tables: DiningTableRepository::new(db.clone()),
        orders: OrderRepository::new(db.clone()),
        items: OrderItemRepository::new(db.clone()),
        db,
    }
}

impl Fixture {
    async fn seed_menu(&self) -> RecordId {
        self.menus
            .create(MenuCreate {
                name: "Carta".into(),
                category: "main".into(),
                start_date: None,
                end_date: None,
            })
            .await
            .expect("create menu")
            .id
            .expect("menu id")
    }

    async fn seed_food(&self, menu: &RecordId, name: &str, price: f64) -> RecordId {
        self.foods
            .create(FoodCreate {
                name: name.into(),
                price,
                food_image: format!("/images/{name}.webp"),
                menu: menu.clone(),
            })
            .await
            .expect("create food")
            .id
            .expect("food id")
    }

    async fn seed_table(&self, number: i64) -> RecordId {
        self.tables
            .create(DiningTableCreate {
                table_number: number,
                number_of_guests: 4,
            })
            .await
            .expect("create table")
            .id
            .expect("table id")
    }

    async fn seed_order(&self, table: Option<RecordId>) -> RecordId {
        self.orders
            .create_for_pack(table)
            .await
            .expect("create order")
            .id
            .expect("order id")
    }

    async fn seed_item(&self, order: &RecordId, food: RecordId, quantity: i32, unit_price: f64) {
        self.items
            .create_lines(
                order,
                vec![OrderItemLine {
                    food,
                    quantity,
                    unit_price,
                }],
            )
            .await
            .expect("create order item");
    }

    async fn delete(&self, id: &RecordId) {
        self.db
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await
            .expect("delete record")
            .check()
            .expect("delete rejected");
    }
}

#[tokio::test]
async fn order_without_items_yields_empty_view() {
    let f = fixture().await;
    let table = f.seed_table(7).await;
    let order = f.seed_order(Some(table)).await;

    let groups = f.composer.compose(&order.to_string()).await.expect("compose");
    assert!(groups.is_empty());
}

#[tokio::test]
async fn garbage_order_id_yields_empty_view_not_error() {
    let f = fixture().await;

    let groups = f.composer.compose("definitely not an id").await.expect("compose");
    assert!(groups.is_empty());

    let groups = f.composer.compose("order:nonexistent").await.expect("compose");
    assert!(groups.is_empty());
}

#[tokio::test]
async fn billing_scenario_sums_per_line_price() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let paella = f.seed_food(&menu, "paella", 10.0).await;
    let sangria = f.seed_food(&menu, "sangria", 5.5).await;
    let table = f.seed_table(12).await;
    let order = f.seed_order(Some(table)).await;

    f.seed_item(&order, paella, 2, 10.0).await;
    f.seed_item(&order, sangria, 1, 5.5).await;

    let groups = f.composer.compose(&order.to_string()).await.expect("compose");
    assert_eq!(groups.len(), 1);

    let group = &groups[0];
    assert_eq!(group.table_number, Some(12));
    assert_eq!(group.total_count, 2);
    // Per-line food price, quantity not multiplied in: 10.00 + 5.50
    assert_eq!(group.payment_due, 15.5);

    assert_eq!(group.order_items.len(), 2);
    let first = &group.order_items[0];
    assert_eq!(first.food_name.as_deref(), Some("paella"));
    assert_eq!(first.amount, Some(10.0));
    assert_eq!(first.price, Some(10.0));
    assert_eq!(first.quantity, 2);
    assert_eq!(first.order_id, Some(order.to_string()));
}

#[tokio::test]
async fn dangling_food_reference_keeps_row_with_nulls() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let paella = f.seed_food(&menu, "paella", 10.0).await;
    let flan = f.seed_food(&menu, "flan", 3.0).await;
    let table = f.seed_table(3).await;
    let order = f.seed_order(Some(table)).await;

    f.seed_item(&order, paella, 1, 10.0).await;
    f.seed_item(&order, flan.clone(), 2, 3.0).await;

    // The food disappears after the item was written
    f.delete(&flan).await;

    let groups = f.composer.compose(&order.to_string()).await.expect("compose");
    assert_eq!(groups.len(), 1);

    let group = &groups[0];
    // Row survives the lost join target and counts toward total_count
    assert_eq!(group.total_count, 2);
    // ...but contributes nothing to the payment sum
    assert_eq!(group.payment_due, 10.0);

    let orphan = &group.order_items[1];
    assert_eq!(orphan.food_name, None);
    assert_eq!(orphan.food_image, None);
    assert_eq!(orphan.amount, None);
    assert_eq!(orphan.quantity, 2);
}

#[tokio::test]
async fn dangling_table_reference_yields_null_table_number() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let paella = f.seed_food(&menu, "paella", 10.0).await;
    let table = f.seed_table(9).await;
    let order = f.seed_order(Some(table.clone())).await;

    f.seed_item(&order, paella, 1, 10.0).await;

    // The table disappears after the order was written
    f.delete(&table).await;

    let groups = f.composer.compose(&order.to_string()).await.expect("compose");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].table_number, None);
    assert_eq!(groups[0].order_items[0].table_id, None);
    assert_eq!(groups[0].payment_due, 10.0);
}

#[tokio::test]
async fn takeaway_order_without_table_composes() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let cafe = f.seed_food(&menu, "cafe", 1.5).await;
    let order = f.seed_order(None).await;

    f.seed_item(&order, cafe, 2, 1.5).await;

    let groups = f.composer.compose(&order.to_string()).await.expect("compose");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].table_number, None);
    assert_eq!(groups[0].total_count, 1);
    assert_eq!(groups[0].payment_due, 1.5);
}

#[tokio::test]
async fn orders_do_not_leak_into_each_others_views() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let paella = f.seed_food(&menu, "paella", 10.0).await;
    let sangria = f.seed_food(&menu, "sangria", 5.5).await;
    let table = f.seed_table(12).await;

    // Two orders sharing the same table
    let first = f.seed_order(Some(table.clone())).await;
    let second = f.seed_order(Some(table)).await;
    f.seed_item(&first, paella, 1, 10.0).await;
    f.seed_item(&second, sangria, 1, 5.5).await;

    let groups = f.composer.compose(&first.to_string()).await.expect("compose");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].total_count, 1);
    assert_eq!(groups[0].payment_due, 10.0);
}

#[tokio::test]
async fn repeated_reads_are_byte_identical() {
    let f = fixture().await;
    let menu = f.seed_menu().await;
    let paella = f.seed_food(&menu, "paella", 10.0).await;
    let sangria = f.seed_food(&menu, "sangria", 5.5).await;
    let table = f.seed_table(12).await;
    let order = f.seed_order(Some(table)).await;

    f.seed_item(&order, paella, 2, 10.0).await;
    f.seed_item(&order, sangria, 1, 5.5).await;

    let first = f.composer.compose(&order.to_string()).await.expect("compose");
    let second = f.composer.compose(&order.to_string()).await.expect("compose");

    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}
