//! Diesel table definitions mirroring `migrations/`.
//!
//! Regenerate with `diesel print-schema` after changing a migration.

diesel::table! {
    clients (id) {
        id -> Uuid,
        #[max_length = 128]
        name -> Varchar,
    }
}

diesel::table! {
    /// Employee roles. Changing a user's role opens a new user version.
    roles (id) {
        id -> Uuid,
        #[max_length = 64]
        name -> Varchar,
        can_manage_financial_data -> Bool,
    }
}

diesel::table! {
    projects (id) {
        id -> Uuid,
        client_id -> Uuid,
        #[max_length = 128]
        name -> Varchar,
    }
}

diesel::table! {
    /// User accounts with their credentials.
    users (id) {
        id -> Uuid,
        #[max_length = 64]
        name -> Varchar,
        #[max_length = 20]
        login -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        role_id -> Nullable<Uuid>,
        client_id -> Nullable<Uuid>,
        admin -> Bool,
        active -> Bool,
        #[max_length = 64]
        password_digest -> Varchar,
        #[max_length = 64]
        password_salt -> Varchar,
        #[max_length = 64]
        password_reset_token -> Nullable<Varchar>,
        password_reset_token_expires_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only user snapshots. `sequence` records insertion order.
    user_versions (sequence) {
        sequence -> Int8,
        user_id -> Uuid,
        #[max_length = 64]
        name -> Varchar,
        #[max_length = 20]
        login -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        role_id -> Nullable<Uuid>,
        client_id -> Nullable<Uuid>,
        admin -> Bool,
        active -> Bool,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    activities (id) {
        id -> Uuid,
        user_id -> Uuid,
        project_id -> Uuid,
        date -> Date,
        minutes -> Int4,
        comments -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    free_days (user_id, date) {
        user_id -> Uuid,
        date -> Date,
    }
}

diesel::joinable!(activities -> projects (project_id));
diesel::joinable!(activities -> users (user_id));
diesel::joinable!(free_days -> users (user_id));
diesel::joinable!(projects -> clients (client_id));
diesel::joinable!(user_versions -> users (user_id));
diesel::joinable!(users -> roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(
    activities,
    clients,
    free_days,
    projects,
    roles,
    user_versions,
    users,
);
