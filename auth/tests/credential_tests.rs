use std::sync::Arc;

use replay_auth::Authenticator;
use replay_auth::AuthenticationError;
use replay_auth::CredentialHasher;
use replay_auth::HashingWorker;
use replay_auth::PasswordSettings;
use replay_auth::Role;
use replay_auth::TokenCodec;
use replay_auth::TokenSettings;
use replay_auth::UserId;
use replay_auth::UserRecord;

fn light_settings() -> PasswordSettings {
    PasswordSettings {
        memory_cost_kib: Some(4096),
        time_cost: Some(1),
        parallelism: Some(1),
    }
}

#[test]
fn test_distinct_passwords_do_not_verify() {
    let hasher = CredentialHasher::new(&light_settings()).unwrap();

    let passwords = ["prop-sword", "prop-sword ", "Prop-sword", "costume", ""];
    let hashes: Vec<String> = passwords
        .iter()
        .map(|p| hasher.hash(p).expect("Failed to hash password"))
        .collect();

    for (i, password) in passwords.iter().enumerate() {
        for (j, hash) in hashes.iter().enumerate() {
            assert_eq!(
                hasher.verify(password, hash).unwrap(),
                i == j,
                "password {:?} against hash of {:?}",
                password,
                passwords[j]
            );
        }
    }
}

#[test]
fn test_hashes_are_salted() {
    let hasher = CredentialHasher::new(&light_settings()).unwrap();

    let first = hasher.hash("same_password").unwrap();
    let second = hasher.hash("same_password").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("same_password", &first).unwrap());
    assert!(hasher.verify("same_password", &second).unwrap());
}

#[tokio::test]
async fn test_login_token_resolves_to_user() {
    let hasher = Arc::new(CredentialHasher::new(&light_settings()).unwrap());
    hasher.self_test().expect("Hashing backend unavailable");

    let codec = Arc::new(
        TokenCodec::from_settings(
            &TokenSettings::new("integration_test_secret_at_least_32_bytes")
                .with_expire_minutes(15),
        )
        .unwrap(),
    );
    let authenticator = Authenticator::new(HashingWorker::new(hasher), Arc::clone(&codec));

    let user = UserRecord {
        id: UserId(42),
        email: "props@replay.test".to_string(),
        name: "Props".to_string(),
        role: Role::User,
        password_hash: authenticator.hash_password("curtain_call").await.unwrap(),
    };

    let result = authenticator
        .authenticate("curtain_call", &user)
        .await
        .expect("Login failed");
    let payload = codec.decode(&result.access_token).unwrap();
    assert_eq!(payload.subject(), UserId(42));
    assert_eq!(result.expires_in, 15 * 60);

    let rejected = authenticator.authenticate("encore", &user).await;
    assert!(matches!(
        rejected,
        Err(AuthenticationError::InvalidCredentials)
    ));
}
