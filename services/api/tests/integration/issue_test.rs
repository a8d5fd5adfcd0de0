use chrono::{Duration, Utc};

use wordwell_api::domain::repository::TxProvider;
use wordwell_api::domain::types::Purpose;
use wordwell_api::error::ApiError;
use wordwell_api::usecase::verification::TxScope;

use crate::helpers::{MemDb, RecordingNotifier, account, manager};

#[tokio::test]
async fn should_create_code_and_mail_it_for_known_user() {
    let alice = account("alice");
    let db = MemDb::with_accounts(vec![alice.clone()]);
    let notifier = RecordingNotifier::default();

    manager(&db, &notifier)
        .issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await
        .unwrap();

    let codes = db.codes();
    assert_eq!(codes.len(), 1, "expected exactly one code record");
    let code = &codes[0];
    assert_eq!(code.user_id, alice.id);
    assert_eq!(code.purpose, Purpose::AccountValidation);
    assert_eq!(code.code.len(), 6);
    assert!(code.code.chars().all(|c| c.is_ascii_digit()));
    assert!(!code.used);
    assert_eq!(code.expires_at, code.created_at + Duration::minutes(15));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1, "expected exactly one mail");
    let (to, _subject, body) = &sent[0];
    assert_eq!(to, "alice@example.com");
    assert!(body.contains(&code.code), "mail must embed the code digits");
}

#[tokio::test]
async fn should_silently_succeed_for_unknown_username() {
    let db = MemDb::default();
    let notifier = RecordingNotifier::default();

    // Indistinguishable from success: no error, and the only difference is
    // the absence of side effects.
    manager(&db, &notifier)
        .issue("nobody", Purpose::PasswordReset, TxScope::Own)
        .await
        .unwrap();

    assert!(db.codes().is_empty(), "no code may be stored");
    assert!(notifier.sent().is_empty(), "no mail may be sent");
}

#[tokio::test]
async fn reissue_keeps_older_codes_in_storage() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let notifier = RecordingNotifier::default();
    let m = manager(&db, &notifier);

    m.issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await
        .unwrap();
    m.issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await
        .unwrap();

    // Resend creates a second record; it does not delete or use up the first.
    let codes = db.codes();
    assert_eq!(codes.len(), 2);
    assert!(codes.iter().all(|c| !c.used));
}

#[tokio::test]
async fn notifier_failure_rolls_back_the_code() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let notifier = RecordingNotifier::failing();

    let result = manager(&db, &notifier)
        .issue("alice", Purpose::AccountValidation, TxScope::Own)
        .await;

    assert!(
        matches!(result, Err(ApiError::Notification(_))),
        "expected Notification error, got {result:?}"
    );
    assert!(
        db.codes().is_empty(),
        "a code must not survive a failed delivery"
    );
}

#[tokio::test]
async fn joined_issue_is_finalized_by_the_transaction_owner() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let notifier = RecordingNotifier::default();
    let m = manager(&db, &notifier);

    // Owner rolls back: the issued code disappears with the rest of the tx.
    let tx = db.begin().await.unwrap();
    m.issue("alice", Purpose::AccountValidation, TxScope::Join(&tx))
        .await
        .unwrap();
    db.rollback(tx).await.unwrap();
    assert!(db.codes().is_empty());

    // Owner commits: the code persists.
    let tx = db.begin().await.unwrap();
    m.issue("alice", Purpose::AccountValidation, TxScope::Join(&tx))
        .await
        .unwrap();
    db.commit(tx).await.unwrap();
    assert_eq!(db.codes().len(), 1);
}

#[tokio::test]
async fn issued_codes_expire_fifteen_minutes_out() {
    let db = MemDb::with_accounts(vec![account("alice")]);
    let notifier = RecordingNotifier::default();

    let before = Utc::now();
    manager(&db, &notifier)
        .issue("alice", Purpose::PasswordReset, TxScope::Own)
        .await
        .unwrap();
    let after = Utc::now();

    let code = &db.codes()[0];
    assert!(code.expires_at >= before + Duration::minutes(15));
    assert!(code.expires_at <= after + Duration::minutes(15));
}
