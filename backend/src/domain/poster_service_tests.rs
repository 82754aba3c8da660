//! Tests for poster generation and download.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockExperienceStore, MockNotifier, MockPosterRenderer, MockPosterStore, MockUserRepository,
    NotifierError, PosterPhoto,
};
use crate::domain::{ErrorCode, Role, StoreOp, UserId, VerificationStatus};
use crate::test_support::{sample_interview, sample_user};

type Service = PosterService<
    MockExperienceStore,
    MockUserRepository,
    MockPosterRenderer,
    MockPosterStore,
    MockNotifier,
>;

#[derive(Default)]
struct Mocks {
    store: MockExperienceStore,
    users: MockUserRepository,
    renderer: MockPosterRenderer,
    posters: MockPosterStore,
    notifier: MockNotifier,
}

impl Mocks {
    fn into_service(self) -> Service {
        PosterService::new(
            Arc::new(self.store),
            Arc::new(self.users),
            Arc::new(self.renderer),
            Arc::new(self.posters),
            Arc::new(self.notifier),
            "https://experiences.example.edu/",
        )
    }
}

fn photo() -> PosterPhoto {
    PosterPhoto {
        content_type: "image/png".to_owned(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

fn svg() -> RenderedPoster {
    RenderedPoster {
        content_type: "image/svg+xml".to_owned(),
        extension: "svg".to_owned(),
        bytes: b"<svg/>".to_vec(),
    }
}

/// Mocks primed for a successful generation up to the store commit.
fn generating_mocks(interview: Interview, owner: User) -> Mocks {
    let expected_key = format!("{}-{}", owner.reg_no, interview.id);
    let mut mocks = Mocks::default();
    mocks
        .store
        .expect_find_interview()
        .return_once(move |_| Ok(Some(interview)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(owner)));
    mocks
        .renderer
        .expect_render()
        .withf(|content: &PosterContent| {
            content.name == "Ada Lovelace"
                && content.reg_no == "2019ugcs001"
                && content.company == "Acme"
                && content.photo == photo()
        })
        .times(1)
        .return_once(|_| Ok(svg()));
    mocks
        .posters
        .expect_save()
        .withf(move |key, _| key == expected_key)
        .times(1)
        .return_once(|key, _| Ok(format!("{key}.svg")));
    mocks
        .store
        .expect_commit()
        .withf(|plan: &WritePlan| {
            matches!(
                plan.ops(),
                [StoreOp::UpdateInterview { changes, .. }]
                    if changes.poster.as_deref().is_some_and(|r| r.ends_with(".svg"))
            )
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
}

#[tokio::test]
async fn generate_records_poster_and_mails_link() {
    let owner = sample_user(Role::User);
    let caller = Caller::new(owner.id, Role::User);
    let interview = sample_interview(owner.id, VerificationStatus::Accepted);
    let id = interview.id;

    let mut mocks = generating_mocks(interview, owner);
    let expected_link =
        format!("https://experiences.example.edu/api/v1/interviews/{id}/poster/download");
    mocks
        .notifier
        .expect_send()
        .withf(move |_, notification| {
            notification
                == &Notification::Poster {
                    link: expected_link.clone(),
                }
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let link = mocks
        .into_service()
        .generate(GeneratePosterRequest {
            caller,
            interview_id: id,
            photo: photo(),
        })
        .await
        .expect("generation succeeds");

    assert_eq!(link.download_path, poster_download_path(id));
}

#[tokio::test]
async fn generate_survives_mail_failure() {
    let owner = sample_user(Role::User);
    let caller = Caller::new(owner.id, Role::User);
    let interview = sample_interview(owner.id, VerificationStatus::Accepted);
    let id = interview.id;

    let mut mocks = generating_mocks(interview, owner);
    mocks
        .notifier
        .expect_send()
        .return_once(|_, _| Err(NotifierError::delivery("provider down")));

    let result = mocks
        .into_service()
        .generate(GeneratePosterRequest {
            caller,
            interview_id: id,
            photo: photo(),
        })
        .await;

    assert!(result.is_ok());
}

#[rstest]
#[case(VerificationStatus::NotVerified)]
#[case(VerificationStatus::InQueue)]
#[case(VerificationStatus::Rejected)]
#[tokio::test]
async fn generate_requires_accepted_interview(#[case] status: VerificationStatus) {
    let owner_id = UserId::random();
    let interview = sample_interview(owner_id, status);
    let id = interview.id;
    let mut mocks = Mocks::default();
    mocks
        .store
        .expect_find_interview()
        .return_once(move |_| Ok(Some(interview)));
    mocks.renderer.expect_render().times(0);

    let err = mocks
        .into_service()
        .generate(GeneratePosterRequest {
            caller: Caller::new(owner_id, Role::User),
            interview_id: id,
            photo: photo(),
        })
        .await
        .expect_err("not accepted");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn generate_refuses_other_users() {
    let interview = sample_interview(UserId::random(), VerificationStatus::Accepted);
    let id = interview.id;
    let mut mocks = Mocks::default();
    mocks
        .store
        .expect_find_interview()
        .return_once(move |_| Ok(Some(interview)));
    mocks.renderer.expect_render().times(0);

    let err = mocks
        .into_service()
        .generate(GeneratePosterRequest {
            caller: Caller::new(UserId::random(), Role::Admin),
            interview_id: id,
            photo: photo(),
        })
        .await
        .expect_err("not the owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn download_without_poster_is_not_found() {
    let owner_id = UserId::random();
    let interview = sample_interview(owner_id, VerificationStatus::Accepted);
    let id = interview.id;
    let mut mocks = Mocks::default();
    mocks
        .store
        .expect_find_interview()
        .return_once(move |_| Ok(Some(interview)));
    mocks.posters.expect_load().times(0);

    let err = mocks
        .into_service()
        .download(Caller::new(owner_id, Role::User), id)
        .await
        .expect_err("no poster yet");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn download_returns_stored_poster() {
    let owner_id = UserId::random();
    let mut interview = sample_interview(owner_id, VerificationStatus::Accepted);
    interview.poster = Some("2019ugcs001-poster.svg".to_owned());
    let id = interview.id;
    let mut mocks = Mocks::default();
    mocks
        .store
        .expect_find_interview()
        .return_once(move |_| Ok(Some(interview)));
    mocks
        .posters
        .expect_load()
        .withf(|reference| reference == "2019ugcs001-poster.svg")
        .return_once(|_| Ok(Some(svg())));

    let poster = mocks
        .into_service()
        .download(Caller::new(owner_id, Role::User), id)
        .await
        .expect("download succeeds");

    assert_eq!(poster, svg());
}
