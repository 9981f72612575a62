//! Seeds a demo event with a few registered participants and prints their
//! ticket codes, so a local scanner can be exercised right away.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use gatepass_server::config::Config;

const DEMO_PARTICIPANTS: [(&str, &str); 3] = [
    ("Ayu Lestari", "ayu@example.com"),
    ("Budi Santoso", "budi@example.com"),
    ("Citra Maharani", "citra@example.com"),
];

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let event_id: Uuid = sqlx::query_scalar(
        "INSERT INTO events (name, description, location, start_time) \
         VALUES ($1, $2, $3, now() + interval '7 days') RETURNING id",
    )
    .bind("GatePass Launch Meetup")
    .bind("Demo event created by the seed binary")
    .bind("Jakarta Convention Center")
    .fetch_one(&pool)
    .await
    .expect("Failed to insert demo event");

    println!("event {event_id}: GatePass Launch Meetup");

    for (full_name, email) in DEMO_PARTICIPANTS {
        let ticket_code = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO participants (ticket_code, full_name, email, event_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&ticket_code)
        .bind(full_name)
        .bind(email)
        .bind(event_id)
        .execute(&pool)
        .await
        .expect("Failed to insert demo participant");

        println!("  {full_name} <{email}>: {ticket_code}");
    }
}
