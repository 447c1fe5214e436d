use crumbs_api::error::CrumbsError;
use crumbs_api::usecase::auth::{
    AuthenticateUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crumbs_api::usecase::credential::hash_api_key;

use crate::helpers::MockUserRepo;

fn register_uc(users: &MockUserRepo) -> RegisterUseCase<MockUserRepo> {
    RegisterUseCase {
        users: users.clone(),
        api_key_prefix: "crumbs".to_owned(),
    }
}

fn input(email: &str, username: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        username: username.to_owned(),
        password: "correct horse".to_owned(),
    }
}

#[tokio::test]
async fn should_register_user_with_hashed_credentials() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();

    let user = register_uc(&users)
        .execute(input(" Alice@Example.com ", "alice"))
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert!(user.api_key.starts_with("crumbs_"));
    assert_eq!(user.api_key_hash, hash_api_key(&user.api_key));
    assert_ne!(user.password_hash, "correct horse");

    let stored = handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, user.id);
}

#[tokio::test]
async fn should_reject_duplicate_email_before_username() {
    let users = MockUserRepo::empty();
    register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();

    let result = register_uc(&users)
        .execute(input("ALICE@example.com", "alice"))
        .await;
    assert!(
        matches!(result, Err(CrumbsError::EmailAlreadyRegistered)),
        "expected EmailAlreadyRegistered, got {result:?}"
    );
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let users = MockUserRepo::empty();
    register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();

    let result = register_uc(&users)
        .execute(input("other@example.com", "alice"))
        .await;
    assert!(
        matches!(result, Err(CrumbsError::UsernameAlreadyTaken)),
        "expected UsernameAlreadyTaken, got {result:?}"
    );
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_report_conflict_when_insert_loses_registration_race() {
    let users = MockUserRepo::racing(vec![]);
    register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();

    let both = register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await;
    assert!(
        matches!(both, Err(CrumbsError::EmailAlreadyRegistered)),
        "expected EmailAlreadyRegistered, got {both:?}"
    );

    let username = register_uc(&users)
        .execute(input("other@example.com", "alice"))
        .await;
    assert!(
        matches!(username, Err(CrumbsError::UsernameAlreadyTaken)),
        "expected UsernameAlreadyTaken, got {username:?}"
    );
    let err = username.unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);

    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_validate_registration_input() {
    let users = MockUserRepo::empty();
    let uc = register_uc(&users);

    let bad_email = uc.execute(input("not-an-email", "alice")).await;
    assert!(matches!(bad_email, Err(CrumbsError::InvalidEmail)));

    let bad_username = uc.execute(input("a@example.com", "has space")).await;
    assert!(matches!(bad_username, Err(CrumbsError::InvalidUsername)));

    let empty_password = uc
        .execute(RegisterInput {
            password: String::new(),
            ..input("a@example.com", "alice")
        })
        .await;
    assert!(matches!(empty_password, Err(CrumbsError::InvalidPassword)));

    assert!(users.users_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_return_same_api_key_on_every_login() {
    let users = MockUserRepo::empty();
    let registered = register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();

    let login = LoginUseCase {
        users: users.clone(),
    };
    for _ in 0..2 {
        let user = login
            .execute(LoginInput {
                email: "Alice@Example.com".to_owned(),
                password: "correct horse".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(user.api_key, registered.api_key);
    }
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let users = MockUserRepo::empty();
    register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();
    let login = LoginUseCase {
        users: users.clone(),
    };

    let wrong_password = login
        .execute(LoginInput {
            email: "alice@example.com".to_owned(),
            password: "battery staple".to_owned(),
        })
        .await;
    let unknown_email = login
        .execute(LoginInput {
            email: "bob@example.com".to_owned(),
            password: "correct horse".to_owned(),
        })
        .await;

    for result in [wrong_password, unknown_email] {
        let err = result.unwrap_err();
        assert!(matches!(err, CrumbsError::InvalidCredentials));
        assert_eq!(err.to_string(), "invalid email or password");
    }
}

#[tokio::test]
async fn should_resolve_bearer_token_to_exactly_one_user() {
    let users = MockUserRepo::empty();
    let alice = register_uc(&users)
        .execute(input("alice@example.com", "alice"))
        .await
        .unwrap();
    let bob = register_uc(&users)
        .execute(input("bob@example.com", "bob"))
        .await
        .unwrap();

    let auth = AuthenticateUseCase {
        users: users.clone(),
    };
    assert_eq!(auth.execute(&alice.api_key).await.unwrap().id, alice.id);
    assert_eq!(auth.execute(&bob.api_key).await.unwrap().id, bob.id);

    let unknown = auth.execute("crumbs_nope").await;
    assert!(matches!(unknown, Err(CrumbsError::InvalidApiKey)));
    let empty = auth.execute("").await;
    assert!(matches!(empty, Err(CrumbsError::InvalidApiKey)));
}
