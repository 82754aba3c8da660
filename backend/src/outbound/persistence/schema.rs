//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Student, verifier and administrator accounts.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Lower-case registration number, unique.
        reg_no -> Varchar,
        batch -> Int4,
        /// Lower-case email, unique.
        email -> Varchar,
        role -> Varchar,
        active -> Bool,
        /// PHC-formatted Argon2 hash.
        password_hash -> Text,
        password_changed_at -> Nullable<Timestamptz>,
        /// SHA-256 hex digest of the outstanding one-time token.
        reset_token -> Nullable<Varchar>,
        reset_expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Aggregate root of a placement experience.
    interviews (id) {
        id -> Uuid,
        interviewee -> Uuid,
        company -> Varchar,
        /// Child round ids in display order.
        round_ids -> Array<Uuid>,
        status -> Varchar,
        verification_status -> Varchar,
        verification_faults -> Array<Text>,
        offer -> Nullable<Varchar>,
        compensation -> Nullable<Float8>,
        poster -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Interview rounds. `(name, interview_id)` is unique.
    rounds (id) {
        id -> Uuid,
        interview_id -> Uuid,
        interviewee -> Uuid,
        name -> Text,
        round_type -> Varchar,
        /// Epoch milliseconds.
        date -> Nullable<Int8>,
        note -> Nullable<Varchar>,
        /// Child question ids in display order.
        question_ids -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Questions with denormalised company and round type.
    questions (id) {
        id -> Uuid,
        round_id -> Uuid,
        interview_id -> Uuid,
        interviewee -> Uuid,
        company -> Varchar,
        round_type -> Varchar,
        title -> Varchar,
        description -> Nullable<Varchar>,
        link -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(interviews -> users (interviewee));
diesel::joinable!(rounds -> interviews (interview_id));
diesel::joinable!(questions -> rounds (round_id));

diesel::allow_tables_to_appear_in_same_query!(users, interviews, rounds, questions);
