use chrono::Duration;

use wordwell_api::domain::types::Purpose;
use wordwell_api::error::ApiError;
use wordwell_api::usecase::verification::{RedeemAction, TxScope};

use crate::helpers::{MemDb, RecordingNotifier, account, fixture_code, manager};

#[tokio::test]
async fn redeem_validates_account_and_spends_the_code() {
    let alice = account("alice");
    let db = MemDb::with_accounts(vec![alice.clone()]);
    let notifier = RecordingNotifier::default();
    let m = manager(&db, &notifier);

    m.issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await
        .unwrap();
    assert!(!db.accounts()[0].validated);

    let digits = db.codes()[0].code.clone();
    m.redeem("alice", &digits, RedeemAction::ValidateAccount)
        .await
        .unwrap();

    assert!(db.accounts()[0].validated, "account must be validated");
    assert!(db.codes()[0].used, "code must be spent");

    // Exactly-once: the same digits never redeem twice.
    let result = m.redeem("alice", &digits, RedeemAction::ValidateAccount).await;
    assert!(
        matches!(result, Err(ApiError::CodeAlreadyUsed)),
        "expected CodeAlreadyUsed, got {result:?}"
    );
}

#[tokio::test]
async fn correct_but_expired_code_reports_expired() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let notifier = RecordingNotifier::default();
    let m = manager(&db, &notifier);

    m.issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await
        .unwrap();
    let digits = db.codes()[0].code.clone();
    db.expire_codes();

    let result = m.redeem("alice", &digits, RedeemAction::ValidateAccount).await;
    assert!(
        matches!(result, Err(ApiError::CodeExpired)),
        "correct digits past expiry must report CodeExpired, got {result:?}"
    );
    assert!(!db.accounts()[0].validated);
    assert!(!db.codes()[0].used);
}

#[tokio::test]
async fn wrong_digits_report_incorrect() {
    let alice = account("alice");
    let db = MemDb::with_accounts(vec![alice.clone()]);
    db.insert_code(fixture_code(alice.id, Purpose::AccountValidation, "111111"));
    let m = manager(&db, &RecordingNotifier::default());

    let result = m.redeem("alice", "222222", RedeemAction::ValidateAccount).await;
    assert!(matches!(result, Err(ApiError::CodeIncorrect)));
    assert!(!db.accounts()[0].validated);
}

#[tokio::test]
async fn wrong_digits_on_a_used_code_still_report_incorrect() {
    let alice = account("alice");
    let db = MemDb::with_accounts(vec![alice.clone()]);
    let mut used = fixture_code(alice.id, Purpose::AccountValidation, "111111");
    used.used = true;
    db.insert_code(used);
    let m = manager(&db, &RecordingNotifier::default());

    // The used/expired branches only fire for matching digits.
    let result = m.redeem("alice", "222222", RedeemAction::ValidateAccount).await;
    assert!(matches!(result, Err(ApiError::CodeIncorrect)));
}

#[tokio::test]
async fn superseded_code_is_incorrect_and_latest_wins() {
    let bob = account("bob");
    let db = MemDb::with_accounts(vec![bob.clone()]);
    let mut first = fixture_code(bob.id, Purpose::PasswordReset, "111111");
    let mut second = fixture_code(bob.id, Purpose::PasswordReset, "222222");
    second.created_at = first.created_at + Duration::seconds(1);
    second.expires_at = second.created_at + Duration::minutes(15);
    first.expires_at = first.created_at + Duration::minutes(15);
    db.insert_code(first);
    db.insert_code(second);
    let m = manager(&db, &RecordingNotifier::default());

    // The first code is unexpired and unused, but no longer the latest.
    let result = m
        .redeem(
            "bob",
            "111111",
            RedeemAction::ResetPassword {
                new_password: "x".to_owned(),
            },
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::CodeIncorrect)),
        "superseded code must read as incorrect, got {result:?}"
    );

    m.redeem(
        "bob",
        "222222",
        RedeemAction::ResetPassword {
            new_password: "x".to_owned(),
        },
    )
    .await
    .unwrap();
    assert_eq!(db.accounts()[0].password_hash, "hashed:x");
}

#[tokio::test]
async fn near_simultaneous_issues_tie_break_deterministically() {
    let bob = account("bob");
    let db = MemDb::with_accounts(vec![bob.clone()]);
    // Identical created_at: the v7 id decides which one is "latest".
    let first = fixture_code(bob.id, Purpose::AccountValidation, "111111");
    let mut second = fixture_code(bob.id, Purpose::AccountValidation, "222222");
    second.created_at = first.created_at;
    second.expires_at = first.expires_at;
    assert!(second.id > first.id);
    db.insert_code(first);
    db.insert_code(second);
    let m = manager(&db, &RecordingNotifier::default());

    let result = m.redeem("bob", "111111", RedeemAction::ValidateAccount).await;
    assert!(matches!(result, Err(ApiError::CodeIncorrect)));
    m.redeem("bob", "222222", RedeemAction::ValidateAccount)
        .await
        .unwrap();
}

#[tokio::test]
async fn redeem_without_any_code_reports_not_found() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let m = manager(&db, &RecordingNotifier::default());

    let result = m.redeem("alice", "123456", RedeemAction::ValidateAccount).await;
    assert!(matches!(result, Err(ApiError::CodeNotFound)));

    // Same for a username that does not exist at all.
    let result = m.redeem("ghost", "123456", RedeemAction::ValidateAccount).await;
    assert!(matches!(result, Err(ApiError::CodeNotFound)));
}

#[tokio::test]
async fn reset_password_replaces_the_stored_credential() {
    let bob = account("bob");
    let db = MemDb::with_accounts(vec![bob.clone()]);
    let notifier = RecordingNotifier::default();
    let m = manager(&db, &notifier);

    // Two forgotten-password requests; C1 stays unused in storage but only
    // C2 is redeemable.
    m.issue("bob", Purpose::PasswordReset, TxScope::Own)
        .await
        .unwrap();
    m.issue("bob", Purpose::PasswordReset, TxScope::Own)
        .await
        .unwrap();
    let codes = db.codes();
    assert_eq!(codes.len(), 2);
    let latest = codes
        .iter()
        .max_by_key(|c| (c.created_at, c.id))
        .unwrap()
        .clone();

    m.redeem(
        "bob",
        &latest.code,
        RedeemAction::ResetPassword {
            new_password: "x".to_owned(),
        },
    )
    .await
    .unwrap();

    let account = &db.accounts()[0];
    assert_eq!(account.password_hash, "hashed:x");
    // Old credential no longer verifies, new one does.
    assert_ne!(account.password_hash, "hashed:old-password");

    let codes = db.codes();
    let spent = codes.iter().find(|c| c.id == latest.id).unwrap();
    assert!(spent.used);
    assert_eq!(
        codes.iter().filter(|c| !c.used).count(),
        1,
        "the superseded code stays unused in storage"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redeems_of_the_same_code_have_exactly_one_winner() {
    let alice = account("alice");
    let db = MemDb::with_accounts(vec![alice.clone()]);
    db.insert_code(fixture_code(alice.id, Purpose::AccountValidation, "123456"));
    let notifier = RecordingNotifier::default();

    let m1 = manager(&db, &notifier);
    let m2 = manager(&db, &notifier);
    let h1 = tokio::spawn(async move {
        m1.redeem("alice", "123456", RedeemAction::ValidateAccount)
            .await
    });
    let h2 = tokio::spawn(async move {
        m2.redeem("alice", "123456", RedeemAction::ValidateAccount)
            .await
    });

    let results = [h1.await.unwrap(), h2.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one redeem may succeed: {results:?}");
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ApiError::CodeAlreadyUsed))),
        "the loser must observe CodeAlreadyUsed: {results:?}"
    );
    assert!(db.accounts()[0].validated);
}
