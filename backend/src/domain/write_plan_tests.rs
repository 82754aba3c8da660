//! Tests for write plan construction and propagation rules.

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{InterviewStatus, QuestionTitle, RoundName, VerificationStatus};

fn question(title: &str) -> QuestionDraft {
    QuestionDraft {
        title: QuestionTitle::new(title).expect("title"),
        description: None,
        link: None,
    }
}

fn round(name: &str, round_type: RoundType, questions: Vec<QuestionDraft>) -> RoundDraft {
    RoundDraft {
        name: RoundName::new(name).expect("round name"),
        round_type,
        date: Some(1_700_000_000_000),
        note: None,
        questions,
    }
}

#[fixture]
fn draft() -> InterviewDraft {
    InterviewDraft {
        company: CompanyName::new("Acme").expect("company"),
        status: InterviewStatus::Ongoing,
        offer: None,
        compensation: None,
        rounds: vec![
            round(
                "OA",
                RoundType::Oa,
                vec![
                    question("Two Sum problem explained"),
                    question("Longest increasing subsequence"),
                ],
            ),
            round("Tech 1", RoundType::Technical, Vec::new()),
        ],
        submit: false,
    }
}

fn inserted_interview(plan: &WritePlan) -> &Interview {
    plan.ops()
        .iter()
        .find_map(|op| match op {
            StoreOp::InsertInterview(interview) => Some(interview),
            _ => None,
        })
        .expect("plan inserts an interview")
}

fn inserted_rounds(plan: &WritePlan) -> Vec<&Round> {
    plan.ops()
        .iter()
        .filter_map(|op| match op {
            StoreOp::InsertRound(round) => Some(round),
            _ => None,
        })
        .collect()
}

fn inserted_questions(plan: &WritePlan) -> Vec<&Question> {
    plan.ops()
        .iter()
        .filter_map(|op| match op {
            StoreOp::InsertQuestion(question) => Some(question),
            _ => None,
        })
        .collect()
}

#[rstest]
fn create_interview_fills_back_references_in_input_order(draft: InterviewDraft) {
    let owner = UserId::random();
    let (id, plan) = WritePlan::create_interview(owner, draft, Utc::now());

    assert!(matches!(plan.ops().first(), Some(StoreOp::InsertInterview(_))));
    let interview = inserted_interview(&plan);
    let rounds = inserted_rounds(&plan);
    let questions = inserted_questions(&plan);

    assert_eq!(interview.id, id);
    assert_eq!(
        interview.round_ids,
        rounds.iter().map(|round| round.id).collect::<Vec<_>>()
    );
    assert_eq!(rounds[0].name.as_ref(), "OA");
    assert_eq!(rounds[1].name.as_ref(), "Tech 1");
    assert_eq!(
        rounds[0].question_ids,
        questions.iter().map(|question| question.id).collect::<Vec<_>>()
    );
    assert!(rounds[1].question_ids.is_empty());

    for round in &rounds {
        assert_eq!(round.interview_id, id);
        assert_eq!(round.interviewee, owner);
    }
    for question in &questions {
        assert_eq!(question.round_id, rounds[0].id);
        assert_eq!(question.interview_id, id);
        assert_eq!(question.interviewee, owner);
        assert_eq!(question.company.as_ref(), "Acme");
        assert_eq!(question.round_type, RoundType::Oa);
    }
}

#[rstest]
#[case(false, VerificationStatus::NotVerified)]
#[case(true, VerificationStatus::InQueue)]
fn submit_flag_sets_initial_verification(
    mut draft: InterviewDraft,
    #[case] submit: bool,
    #[case] expected: VerificationStatus,
) {
    draft.submit = submit;
    let (_, plan) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    assert_eq!(inserted_interview(&plan).verification.status, expected);
}

#[rstest]
fn create_round_links_round_after_inserts(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();

    let (round_id, plan) = WritePlan::create_round(
        &interview,
        round("HR", RoundType::Hr, vec![question("Why do you want to join?")]),
        Utc::now(),
    );

    assert_eq!(
        plan.ops().last(),
        Some(&StoreOp::LinkRound {
            interview_id: interview.id,
            round_id,
        })
    );
    let questions = inserted_questions(&plan);
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].round_type, RoundType::Hr);
    assert_eq!(questions[0].company, interview.company);
}

#[rstest]
fn create_question_copies_parent_fields(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();
    let parent = inserted_rounds(&create)[1].clone();

    let (question_id, plan) = WritePlan::create_question(
        &interview,
        &parent,
        question("Design a rate limiter"),
        Utc::now(),
    );

    let question = inserted_questions(&plan)[0];
    assert_eq!(question.id, question_id);
    assert_eq!(question.round_type, RoundType::Technical);
    assert_eq!(question.interview_id, interview.id);
    assert_eq!(
        plan.ops().last(),
        Some(&StoreOp::LinkQuestion {
            round_id: parent.id,
            question_id,
        })
    );
}

#[rstest]
fn company_rename_propagates_to_questions(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();
    let renamed = CompanyName::new("Acme Labs").expect("company");

    let plan = WritePlan::update_interview(
        &interview,
        InterviewChanges {
            company: Some(renamed.clone()),
            ..Default::default()
        },
    );

    assert_eq!(plan.ops().len(), 2);
    assert_eq!(
        plan.ops()[1],
        StoreOp::Propagate(Propagation::QuestionCompany {
            interview_id: interview.id,
            company: renamed,
        })
    );
}

#[rstest]
fn unchanged_company_does_not_propagate(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();

    let plan = WritePlan::update_interview(
        &interview,
        InterviewChanges {
            company: Some(interview.company.clone()),
            status: Some(InterviewStatus::Placed),
            ..Default::default()
        },
    );

    assert_eq!(plan.ops().len(), 1);
}

#[rstest]
fn round_type_change_propagates_to_questions(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let current = inserted_rounds(&create)[0].clone();

    let plan = WritePlan::update_round(
        &current,
        RoundChanges {
            round_type: Some(RoundType::Technical),
            ..Default::default()
        },
    );

    assert!(plan.ops().contains(&StoreOp::Propagate(
        Propagation::QuestionRoundType {
            round_id: current.id,
            round_type: RoundType::Technical,
        }
    )));
}

#[rstest]
fn empty_changes_build_empty_plans(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();
    let current = inserted_rounds(&create)[0].clone();
    let question = inserted_questions(&create)[0].clone();

    assert!(WritePlan::update_interview(&interview, InterviewChanges::default()).is_empty());
    assert!(WritePlan::update_round(&current, RoundChanges::default()).is_empty());
    assert!(WritePlan::update_question(&question, QuestionChanges::default()).is_empty());
}

#[rstest]
fn delete_interview_cascades_children_first(draft: InterviewDraft) {
    let (id, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let interview = inserted_interview(&create).clone();

    let plan = WritePlan::delete_interview(&interview);

    assert_eq!(
        plan.into_ops(),
        vec![
            StoreOp::DeleteQuestions(QuestionSelection::OfInterview(id)),
            StoreOp::DeleteRounds(RoundSelection::OfInterview(id)),
            StoreOp::DeleteInterview(id),
        ]
    );
}

#[rstest]
fn delete_round_unlinks_from_interview(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let target = inserted_rounds(&create)[0].clone();

    let plan = WritePlan::delete_round(&target);

    assert_eq!(
        plan.into_ops(),
        vec![
            StoreOp::DeleteQuestions(QuestionSelection::OfRound(target.id)),
            StoreOp::UnlinkRound {
                interview_id: target.interview_id,
                round_id: target.id,
            },
            StoreOp::DeleteRounds(RoundSelection::One(target.id)),
        ]
    );
}

#[rstest]
fn delete_question_unlinks_from_round(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let target = inserted_questions(&create)[0].clone();

    let plan = WritePlan::delete_question(&target);

    assert_eq!(
        plan.ops()[0],
        StoreOp::UnlinkQuestion {
            round_id: target.round_id,
            question_id: target.id,
        }
    );
}

#[rstest]
fn rules_ignore_unrelated_parents(draft: InterviewDraft) {
    let (_, create) = WritePlan::create_interview(UserId::random(), draft, Utc::now());
    let current = inserted_rounds(&create)[0].clone();
    let changes = RoundChanges {
        name: Some(RoundName::new("Online assessment").expect("name")),
        ..Default::default()
    };

    assert!(propagations(ParentChange::Round {
        current: &current,
        changes: &changes,
    })
    .is_empty());
}

#[rstest]
fn verification_guard_runs_before_the_plan() {
    let mut plan = WritePlan::new();
    let id = Uuid::new_v4();
    plan.push(StoreOp::DeleteInterview(id));

    let guarded = plan.require_verification(id, AWAITING_DECISION);

    assert_eq!(
        guarded.ops(),
        [
            StoreOp::RequireVerification {
                interview_id: id,
                allowed: AWAITING_DECISION,
            },
            StoreOp::DeleteInterview(id),
        ]
    );
    assert!(!EDITABLE.contains(&VerificationStatus::Accepted));
}
