use std::sync::Arc;

use super::common::*;
use crate::applications::{
    ApplicationId, ApplicationRequest, ApplicationService, ApplicationServiceError,
    ApplicationStatus, StatusUpdate, TransitionError, TransitionPolicy,
};
use crate::jobs::JobId;
use crate::notifications::{NotificationService, NotificationType};

fn request(job_id: &str, draft: bool) -> ApplicationRequest {
    ApplicationRequest {
        job_id: JobId(job_id.to_string()),
        notes: Some("  Happy to relocate.  ".to_string()),
        draft,
    }
}

fn move_to(status: ApplicationStatus) -> StatusUpdate {
    StatusUpdate {
        status: Some(status),
        notes: None,
    }
}

#[tokio::test]
async fn apply_submits_and_notifies_the_recruiter() {
    let (service, backend) = build_service(TransitionPolicy::default());

    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("application accepted");

    assert_eq!(application.status, ApplicationStatus::Submitted);
    assert_eq!(application.notes.as_deref(), Some("Happy to relocate."));
    assert_eq!(application.job_seeker_id, user(SEEKER));

    let inbox = notifications_for(&backend, RECRUITER);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationType::Info);
    assert_eq!(
        inbox[0].link.as_deref(),
        Some("/recruiter/jobs/job-open/applications")
    );
}

#[tokio::test]
async fn drafts_stay_quiet_until_submitted() {
    let (service, backend) = build_service(TransitionPolicy::default());

    let draft = service
        .apply(&user(SEEKER), request("job-open", true))
        .await
        .expect("draft saved");
    assert_eq!(draft.status, ApplicationStatus::Draft);
    assert!(notifications_for(&backend, RECRUITER).is_empty());

    let submitted = service
        .submit_draft(&user(SEEKER), &draft.id)
        .await
        .expect("draft submitted");
    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert_eq!(notifications_for(&backend, RECRUITER).len(), 1);

    match service.submit_draft(&user(SEEKER), &draft.id).await {
        Err(ApplicationServiceError::Transition(TransitionError { from, to })) => {
            assert_eq!(from, ApplicationStatus::Submitted);
            assert_eq!(to, ApplicationStatus::Submitted);
        }
        other => panic!("expected transition error, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_draft_hides_other_seekers_applications() {
    let (service, _) = build_service(TransitionPolicy::default());
    let draft = service
        .apply(&user(SEEKER), request("job-open", true))
        .await
        .expect("draft saved");

    match service.submit_draft(&user("seeker-2"), &draft.id).await {
        Err(ApplicationServiceError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn apply_rejects_missing_closed_and_duplicate_postings() {
    let (service, _) = build_service(TransitionPolicy::default());

    match service.apply(&user(SEEKER), request("job-missing", false)).await {
        Err(ApplicationServiceError::JobNotFound) => {}
        other => panic!("expected job not found, got {other:?}"),
    }
    match service.apply(&user(SEEKER), request("job-closed", false)).await {
        Err(ApplicationServiceError::JobClosed) => {}
        other => panic!("expected closed job, got {other:?}"),
    }

    service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("first application");
    match service.apply(&user(SEEKER), request("job-open", true)).await {
        Err(ApplicationServiceError::Duplicate) => {}
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[tokio::test]
async fn permissive_policy_lets_recruiters_set_any_status() {
    let (service, backend) = build_service(TransitionPolicy::Permissive);
    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("applied");

    let accepted = service
        .update_status(
            &user(RECRUITER),
            &application.id,
            move_to(ApplicationStatus::Accepted),
        )
        .await
        .expect("accepted");
    assert_eq!(accepted.status, ApplicationStatus::Accepted);

    let reopened = service
        .update_status(
            &user(RECRUITER),
            &application.id,
            move_to(ApplicationStatus::Review),
        )
        .await
        .expect("permissive policy reopens");
    assert_eq!(reopened.status, ApplicationStatus::Review);

    let kinds: Vec<NotificationType> = notifications_for(&backend, SEEKER)
        .into_iter()
        .map(|notification| notification.kind)
        .collect();
    assert_eq!(kinds, vec![NotificationType::Success, NotificationType::Info]);
}

#[tokio::test]
async fn forward_only_policy_blocks_backwards_moves() {
    let (service, backend) = build_service(TransitionPolicy::ForwardOnly);
    assert_eq!(service.policy(), TransitionPolicy::ForwardOnly);
    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("applied");

    for status in [ApplicationStatus::Review, ApplicationStatus::Rejected] {
        service
            .update_status(&user(RECRUITER), &application.id, move_to(status))
            .await
            .expect("forward move");
    }

    match service
        .update_status(
            &user(RECRUITER),
            &application.id,
            move_to(ApplicationStatus::Review),
        )
        .await
    {
        Err(ApplicationServiceError::Transition(err)) => {
            assert_eq!(err.from, ApplicationStatus::Rejected);
        }
        other => panic!("expected transition error, got {other:?}"),
    }

    let stored = service
        .for_seeker(&user(SEEKER))
        .await
        .expect("listing works");
    assert_eq!(stored[0].status, ApplicationStatus::Rejected);
    let last = notifications_for(&backend, SEEKER)
        .pop()
        .expect("seeker notified");
    assert_eq!(last.kind, NotificationType::Warning);
    assert!(last.message.contains("Rejected"));
}

#[tokio::test]
async fn notes_only_updates_do_not_notify() {
    let (service, backend) = build_service(TransitionPolicy::default());
    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("applied");

    let updated = service
        .update_status(
            &user(RECRUITER),
            &application.id,
            StatusUpdate {
                status: None,
                notes: Some("Strong portfolio".to_string()),
            },
        )
        .await
        .expect("notes saved");

    assert_eq!(updated.status, ApplicationStatus::Submitted);
    assert_eq!(updated.notes.as_deref(), Some("Strong portfolio"));
    assert!(notifications_for(&backend, SEEKER).is_empty());
}

#[tokio::test]
async fn recruiters_only_see_their_own_jobs() {
    let (service, _) = build_service(TransitionPolicy::default());
    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("applied");

    match service
        .for_job(&user(OTHER_RECRUITER), &JobId("job-open".to_string()))
        .await
    {
        Err(ApplicationServiceError::JobNotFound) => {}
        other => panic!("expected job not found, got {other:?}"),
    }
    match service
        .update_status(
            &user(OTHER_RECRUITER),
            &application.id,
            move_to(ApplicationStatus::Review),
        )
        .await
    {
        Err(ApplicationServiceError::JobNotFound) => {}
        other => panic!("expected job not found, got {other:?}"),
    }

    let listed = service
        .for_job(&user(RECRUITER), &JobId("job-open".to_string()))
        .await
        .expect("owner lists applications");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn update_status_reports_unknown_applications() {
    let (service, _) = build_service(TransitionPolicy::default());

    match service
        .update_status(
            &user(RECRUITER),
            &ApplicationId("missing".to_string()),
            move_to(ApplicationStatus::Review),
        )
        .await
    {
        Err(ApplicationServiceError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn notification_failures_do_not_undo_the_write() {
    let backend = seeded_backend();
    let notifications = Arc::new(NotificationService::new(Arc::new(OfflineProcedure)));
    let service = ApplicationService::new(
        backend.clone(),
        backend.clone(),
        notifications,
        TransitionPolicy::default(),
    );

    let application = service
        .apply(&user(SEEKER), request("job-open", false))
        .await
        .expect("write survives notification failure");

    let stored = service
        .for_seeker(&user(SEEKER))
        .await
        .expect("listing works");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, application.id);
}

#[tokio::test]
async fn drafts_stay_private_until_submitted() {
    let (service, backend) = build_service(TransitionPolicy::Permissive);
    let draft = service
        .apply(&user(SEEKER), request("job-open", true))
        .await
        .expect("draft saved");

    let listed = service
        .for_job(&user(RECRUITER), &JobId("job-open".to_string()))
        .await
        .expect("owner lists applications");
    assert!(listed.is_empty());

    match service
        .update_status(
            &user(RECRUITER),
            &draft.id,
            move_to(ApplicationStatus::Review),
        )
        .await
    {
        Err(ApplicationServiceError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(notifications_for(&backend, SEEKER).is_empty());

    service
        .submit_draft(&user(SEEKER), &draft.id)
        .await
        .expect("draft submitted");
    let listed = service
        .for_job(&user(RECRUITER), &JobId("job-open".to_string()))
        .await
        .expect("owner lists applications");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, ApplicationStatus::Submitted);
}
