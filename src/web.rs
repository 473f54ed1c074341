use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::display::format_result_with;
use crate::error::ScheduleError;
use crate::form::{append_vote_to_csv, VoteSubmissionRequest};
use crate::parser::{load_votes, read_votes, VoteSheet};
use crate::schedule::{day_priorities, index_by_day, optimize, Day, DayPriority, OptimizationResult};

// In-memory state; the vote CSV on disk is the only persistence
pub struct AppState {
    pub sheet: Mutex<VoteSheet>,
    pub result: Mutex<Option<OptimizationResult>>,
    pub votes_path: PathBuf,
    pub admin_password: String,
}

impl AppState {
    pub fn new(sheet: VoteSheet, votes_path: PathBuf, admin_password: String) -> Self {
        AppState {
            sheet: Mutex::new(sheet),
            result: Mutex::new(None),
            votes_path,
            admin_password,
        }
    }

    fn is_admin(&self, req: &HttpRequest) -> bool {
        req.headers()
            .get("X-Admin-Password")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|password| password == self.admin_password)
    }
}

/// Server settings collected by the CLI
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub votes_path: PathBuf,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
pub struct VolunteerRequest {
    player_id: String,
}

#[derive(Deserialize)]
pub struct ChoiceRequest {
    player_id: String,
    day: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    players: usize,
    days: Vec<DayPriority>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn error_response(err: &ScheduleError) -> HttpResponse {
    let status = match err {
        ScheduleError::UnknownPlayer(_) => StatusCode::NOT_FOUND,
        ScheduleError::NoDoublePlayPending => StatusCode::CONFLICT,
        ScheduleError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status).json(serde_json::json!({"success": false, "error": err.to_string()}))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

fn no_result() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"error": "No pods calculated yet"}))
}

// Admin login endpoint
async fn admin_login(req: web::Json<LoginRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    if req.password == state.admin_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Admin CSV upload: replaces the vote sheet and recalculates
async fn admin_upload(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !state.is_admin(&req) {
        return Ok(unauthorized());
    }

    let uploaded = match read_votes(&body[..]) {
        Ok(sheet) => sheet,
        Err(e) => {
            warn!(error = %e, "rejected uploaded vote sheet");
            return Ok(error_response(&e));
        }
    };

    std::fs::write(&state.votes_path, &body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to save file: {}", e)))?;

    let result = optimize(&uploaded.availability, &uploaded.preferences);
    let players = uploaded.availability.len();
    let pods = result.pods.len();

    *lock(&state.sheet)? = uploaded;
    *lock(&state.result)? = Some(result);

    info!(players, pods, "vote sheet uploaded");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "players": players,
        "pods": pods,
    })))
}

// Player vote: appended to the sheet on disk and in memory
async fn submit_vote(req: web::Json<VoteSubmissionRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let submission = match req.into_inner().into_submission(Utc::now()) {
        Ok(submission) => submission,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut sheet = lock(&state.sheet)?;
    if let Err(e) = append_vote_to_csv(&submission, &state.votes_path) {
        return Ok(error_response(&e));
    }
    sheet.record(
        submission.player_id.clone(),
        submission.name.clone(),
        submission.days.clone(),
        submission.preferences.clone(),
    );
    // Any earlier result no longer matches the votes
    *lock(&state.result)? = None;

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "player_id": submission.player_id})))
}

async fn calculate(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !state.is_admin(&req) {
        return Ok(unauthorized());
    }

    let sheet = lock(&state.sheet)?;
    let result = optimize(&sheet.availability, &sheet.preferences);
    let response = HttpResponse::Ok().json(&result);
    *lock(&state.result)? = Some(result);
    Ok(response)
}

async fn get_pods(state: web::Data<AppState>) -> Result<HttpResponse> {
    match &*lock(&state.result)? {
        Some(result) => Ok(HttpResponse::Ok().json(result)),
        None => Ok(no_result()),
    }
}

async fn get_pods_text(state: web::Data<AppState>) -> Result<HttpResponse> {
    let sheet = lock(&state.sheet)?;
    let result = lock(&state.result)?;
    match &*result {
        Some(result) => {
            let text = format_result_with(result, |id| sheet.display_name(id));
            Ok(HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text))
        }
        None => Ok(no_result()),
    }
}

async fn volunteer(req: web::Json<VolunteerRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sheet = lock(&state.sheet)?;
    let mut result = lock(&state.result)?;
    let Some(result) = result.as_mut() else {
        return Ok(no_result());
    };

    match result.accept_volunteer(&req.player_id, &sheet.preferences) {
        Ok(pod) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "pod": pod}))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Admin resolution of a player needed on two days
async fn choose_day(
    req: HttpRequest,
    choice: web::Json<ChoiceRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.is_admin(&req) {
        return Ok(unauthorized());
    }

    let day: Day = match choice.day.parse() {
        Ok(day) => day,
        Err(e) => return Ok(error_response(&ScheduleError::from(e))),
    };

    let mut sheet = lock(&state.sheet)?;
    let restricted = match sheet.availability.restrict_player(&choice.player_id, day) {
        Ok(restricted) => restricted,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = optimize(&restricted, &sheet.preferences);
    sheet.availability = restricted;
    let response = HttpResponse::Ok().json(&result);
    *lock(&state.result)? = Some(result);

    info!(player_id = %choice.player_id, day = %day, "player choice applied");
    Ok(response)
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let sheet = lock(&state.sheet)?;
    if sheet.availability.is_empty() {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No data available"})));
    }

    let index = index_by_day(&sheet.availability);
    Ok(HttpResponse::Ok().json(StatsResponse {
        players: sheet.availability.len(),
        days: day_priorities(&index, &sheet.availability),
    }))
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/upload", web::post().to(admin_upload))
        .route("/api/vote", web::post().to(submit_vote))
        .route("/api/calculate", web::post().to(calculate))
        .route("/api/pods", web::get().to(get_pods))
        .route("/api/pods/text", web::get().to(get_pods_text))
        .route("/api/volunteer", web::post().to(volunteer))
        .route("/api/choice", web::post().to(choose_day))
        .route("/api/stats", web::get().to(get_stats));
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let sheet = if config.votes_path.exists() {
        match load_votes(&config.votes_path) {
            Ok(sheet) => sheet,
            Err(e) => {
                warn!(path = %config.votes_path.display(), error = %e, "starting with an empty vote sheet");
                VoteSheet::default()
            }
        }
    } else {
        VoteSheet::default()
    };
    info!(players = sheet.availability.len(), "vote sheet ready");

    let app_state = web::Data::new(AppState::new(sheet, config.votes_path, config.admin_password));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
