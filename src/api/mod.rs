use axum::{
    Router,
    routing::{get, post, put},
};

pub mod api_error;
pub mod auth_extractor;
pub mod books;
pub mod clubs;
pub mod discussions;
pub mod meetings;
pub mod polls;
pub mod progress;
pub mod quotes;
pub mod users;

use crate::AppState;

pub async fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(users::register))
        .route("/auth/login", post(users::login))
        .route(
            "/auth/profile",
            get(users::get_profile).put(users::update_profile),
        )
        // Books
        .route("/books", get(books::list).post(books::propose))
        .route("/books/{id}", get(books::get))
        .route("/books/{id}/vote", post(books::vote).delete(books::unvote))
        .route("/books/{id}/status", put(books::set_status))
        .route("/books/{id}/rate", post(books::rate))
        // Clubs
        .route("/clubs", get(clubs::list).post(clubs::create))
        .route("/clubs/my-clubs", get(clubs::mine))
        .route("/clubs/{id}", get(clubs::get).put(clubs::update))
        .route("/clubs/{id}/join", post(clubs::join))
        .route("/clubs/{id}/leave", post(clubs::leave))
        .route("/clubs/{id}/current-book", put(clubs::set_current_book))
        // Polls
        .route("/votes", get(polls::list).post(polls::create))
        .route("/votes/{id}/vote", post(polls::vote))
        .route("/votes/{id}/results", get(polls::get_results))
        .route("/votes/{id}/close", put(polls::close))
        // Reading progress
        .route(
            "/reading-progress",
            get(progress::mine).post(progress::upsert),
        )
        .route("/reading-progress/{id}", get(progress::for_book_mine))
        .route(
            "/reading-progress/book/{book_id}/all",
            get(progress::for_book_all),
        )
        .route("/reading-progress/{id}/notes", post(progress::create_note))
        .route("/reading-progress/{id}/status", put(progress::set_status))
        // Quotes
        .route("/quotes", get(quotes::list).post(quotes::create))
        .route("/quotes/popular", get(quotes::popular))
        .route("/quotes/user/{user_id}", get(quotes::by_user))
        .route(
            "/quotes/{id}",
            get(quotes::get).put(quotes::update).delete(quotes::delete),
        )
        .route(
            "/quotes/{id}/like",
            post(quotes::like).delete(quotes::unlike),
        )
        .route("/quotes/{id}/comments", post(quotes::comment))
        .route("/quotes/{id}/comments/like", post(quotes::comment_like))
        .route("/quotes/{id}/collection", post(quotes::collect))
        .route("/quotes/{id}/favorite", post(quotes::favorite))
        // Discussions
        .route("/discussions", post(discussions::create))
        .route(
            "/discussions/book/{book_id}",
            get(discussions::list_for_book),
        )
        .route(
            "/discussions/{id}",
            get(discussions::get).delete(discussions::delete),
        )
        .route("/discussions/{id}/reply", post(discussions::reply))
        // Meetings
        .route("/meetings", get(meetings::list).post(meetings::create))
        .route("/meetings/{id}/rsvp", post(meetings::attend))
}
