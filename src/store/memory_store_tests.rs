use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::Error;
use crate::payment_requests::NewPaymentRequest;
use crate::store::{
    CategoryStore, MemoryStore, PaymentRequestStore, TransactionStore, UserId, UserStore,
};
use crate::transactions::{NewTransaction, TransactionKind, TransactionUpdate};

fn dt(y: i32, mo: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn deposit(date: NaiveDateTime) -> NewTransaction {
    NewTransaction {
        date,
        amount: dec!(10),
        description: "Salary".to_string(),
        external_iban: "NL39RABO0300065264".to_string(),
        kind: TransactionKind::Deposit,
        category_id: None,
    }
}

#[tokio::test]
async fn unknown_users_are_rejected() {
    let store = MemoryStore::new();
    let stranger = UserId::generate();

    assert!(matches!(
        store.transactions_ascending(stranger),
        Err(Error::UnknownUser)
    ));
    assert!(matches!(store.categories(stranger), Err(Error::UnknownUser)));
    assert!(matches!(
        store.insert_transaction(stranger, &deposit(dt(2018, 1, 1))).await,
        Err(Error::UnknownUser)
    ));
}

#[tokio::test]
async fn users_are_isolated() {
    let store = MemoryStore::new();
    let alice = store.create_user().await.unwrap();
    let bob = store.create_user().await.unwrap();

    store.insert_transaction(alice, &deposit(dt(2018, 1, 1))).await.unwrap();

    assert_eq!(store.transactions_ascending(alice).unwrap().len(), 1);
    assert!(store.transactions_ascending(bob).unwrap().is_empty());

    // Id sequences are per user.
    let bobs = store.insert_transaction(bob, &deposit(dt(2018, 1, 2))).await.unwrap();
    assert_eq!(bobs.id, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_allocate_unique_ids() {
    let store = Arc::new(MemoryStore::new());
    let user = store.create_user().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..32u32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert_transaction(user, &deposit(dt(2018, 1, 1 + i % 28)))
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 32);
    assert_eq!(*ids.iter().min().unwrap(), 1);
    assert_eq!(*ids.iter().max().unwrap(), 32);
}

#[tokio::test]
async fn transactions_stay_ascending_by_date() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    store.insert_transaction(user, &deposit(dt(2018, 3, 1))).await.unwrap();
    store.insert_transaction(user, &deposit(dt(2018, 1, 1))).await.unwrap();
    store.insert_transaction(user, &deposit(dt(2018, 2, 1))).await.unwrap();

    let dates: Vec<_> = store
        .transactions_ascending(user)
        .unwrap()
        .iter()
        .map(|t| t.date)
        .collect();
    assert_eq!(dates, vec![dt(2018, 1, 1), dt(2018, 2, 1), dt(2018, 3, 1)]);
    assert_eq!(store.latest_transaction_date(user).unwrap(), Some(dt(2018, 3, 1)));
}

#[tokio::test]
async fn updating_the_date_reorders_the_history() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    let first = store.insert_transaction(user, &deposit(dt(2018, 1, 1))).await.unwrap();
    store.insert_transaction(user, &deposit(dt(2018, 2, 1))).await.unwrap();

    store
        .apply_transaction_update(
            user,
            first.id,
            &TransactionUpdate {
                date: Some(dt(2018, 3, 1)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let ids: Vec<_> = store
        .transactions_ascending(user)
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn deleting_a_category_unlinks_transactions() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    let category = store.insert_category(user, "Groceries").await.unwrap();
    let tx = store.insert_transaction(user, &deposit(dt(2018, 1, 1))).await.unwrap();
    store
        .set_transaction_category(user, tx.id, Some(category.id))
        .await
        .unwrap();

    assert!(store.delete_category(user, category.id).await.unwrap());
    assert_eq!(store.transaction(user, tx.id).unwrap().unwrap().category, None);
    // Deleting twice reports the miss.
    assert!(!store.delete_category(user, category.id).await.unwrap());
}

#[tokio::test]
async fn lifetime_balance_keeps_the_maximum() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    assert_eq!(store.highest_lifetime_balance(user).unwrap(), dec!(0));
    assert_eq!(store.record_lifetime_balance(user, dec!(100)).await.unwrap(), dec!(100));
    assert_eq!(store.record_lifetime_balance(user, dec!(40)).await.unwrap(), dec!(100));
    assert_eq!(store.highest_lifetime_balance(user).unwrap(), dec!(100));
}

#[tokio::test]
async fn zero_payment_requests_are_born_filled() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    let request = store
        .insert_payment_request(
            user,
            &NewPaymentRequest {
                description: "Nothing".to_string(),
                due_date: dt(2018, 6, 1),
                amount: dec!(10),
                number_of_requests: 0,
            },
        )
        .await
        .unwrap();
    assert!(request.filled);
}

#[tokio::test]
async fn linked_transactions_are_resolved_on_read() {
    let store = MemoryStore::new();
    let user = store.create_user().await.unwrap();

    let request = store
        .insert_payment_request(
            user,
            &NewPaymentRequest {
                description: "Dinner".to_string(),
                due_date: dt(2018, 6, 1),
                amount: dec!(10),
                number_of_requests: 2,
            },
        )
        .await
        .unwrap();
    let tx = store.insert_transaction(user, &deposit(dt(2018, 1, 1))).await.unwrap();

    let linked = store
        .link_transaction_to_request(user, request.id, tx.id)
        .await
        .unwrap();
    assert_eq!(linked, 1);

    let requests = store.payment_requests(user).unwrap();
    assert_eq!(requests[0].transactions, vec![tx]);
}
