//! Interactive terminal client for the course generator service.
//!
//! Prompts for a topic, posts it to the orchestration endpoint and renders
//! two panels: the raw course outline and the per-lesson video list. Each
//! response is held as immutable data and the whole view is printed from it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Arg, Command};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, Text};

use course_generator::api::models::{CourseRequest, CourseResponse, ModuleVideoBundle};
use course_generator::youtube::VideoRecord;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
const THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Course UI")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal client for the course generator")
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .value_name("URL")
                .help("Base URL of the course generator service")
                .default_value(DEFAULT_SERVER),
        )
        .get_matches();

    let server = matches.get_one::<String>("server").expect("has default");
    let endpoint = url::Url::parse(server)?.join("generate-course")?;

    let client = reqwest::Client::new();
    let thumbnail_dir = std::env::temp_dir().join("course-ui-thumbnails");

    print_banner();

    loop {
        let topic = match Text::new("Enter topic:")
            .with_help_message("e.g. Python basics")
            .prompt()
        {
            Ok(topic) => topic.trim().to_string(),
            Err(_) => break,
        };

        if topic.is_empty() {
            println!("{}", "Please enter a topic".red());
            continue;
        }

        let spinner = spinner(format!("Generating course for \"{}\"...", topic));
        let result = fetch_course(&client, endpoint.as_str(), &topic).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => render_response(&client, &thumbnail_dir, &response).await,
            Err(e) => println!("{}", format!("Failed to fetch course: {}", e).red()),
        }

        let again = Confirm::new("Generate another course?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !again {
            break;
        }
    }

    Ok(())
}

async fn fetch_course(
    client: &reqwest::Client,
    endpoint: &str,
    topic: &str,
) -> Result<CourseResponse> {
    let response = client
        .post(endpoint)
        .json(&CourseRequest {
            topic: topic.to_string(),
        })
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json().await?)
}

/// Print both panels from the orchestration response.
async fn render_response(client: &reqwest::Client, thumbnail_dir: &Path, response: &CourseResponse) {
    print_section("Course outline");
    match serde_json::to_string_pretty(&response.course_outline) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", response.course_outline),
    }

    print_section("Lesson videos");
    if response.lesson_videos.is_empty() {
        println!("{}", "No videos found.".red());
        return;
    }

    for module in &response.lesson_videos {
        render_module(client, thumbnail_dir, module).await;
    }
}

async fn render_module(client: &reqwest::Client, thumbnail_dir: &Path, module: &ModuleVideoBundle) {
    println!();
    println!("{}", module.module_title.as_str().green().bold());

    for lesson in &module.lessons {
        println!("  {}", lesson.lesson_title.as_str().italic());

        if lesson.videos.is_empty() {
            println!(
                "    {}",
                "No relevant video found for this lesson.".red()
            );
            continue;
        }

        for video in &lesson.videos {
            render_video(client, thumbnail_dir, video).await;
        }
    }
}

async fn render_video(client: &reqwest::Client, thumbnail_dir: &Path, video: &VideoRecord) {
    println!("    {}", video.title.as_str().blue());
    println!(
        "      {} · {}",
        video.channel.as_str().dim(),
        format_published(&video.published_at).dim()
    );
    println!("      {}", video.url.as_str().underlined());

    // Best-effort thumbnail fetch; failure degrades to the title-only view.
    if let Some(path) = fetch_thumbnail(client, thumbnail_dir, &video.video_id).await {
        println!("      {}", format!("thumbnail: {}", path.display()).dim());
    }
}

/// Download the video thumbnail next to the terminal session so the user can
/// open it. Any failure is swallowed.
async fn fetch_thumbnail(
    client: &reqwest::Client,
    thumbnail_dir: &Path,
    video_id: &str,
) -> Option<PathBuf> {
    let url = format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id);

    let response = client
        .get(&url)
        .timeout(THUMBNAIL_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;
    let bytes = response.bytes().await.ok()?;

    tokio::fs::create_dir_all(thumbnail_dir).await.ok()?;
    let path = thumbnail_dir.join(format!("{}.jpg", video_id));
    tokio::fs::write(&path, &bytes).await.ok()?;

    Some(path)
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(message);
    spinner
}

fn print_banner() {
    println!();
    println!("{}", "AI Course Generator".cyan().bold());
    println!("{}", format!("v{}", env!("CARGO_PKG_VERSION")).dim());
    println!();
}

fn print_section(title: &str) {
    println!();
    println!("{}", format!("── {} ──", title).cyan().bold());
}

fn format_published(published_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(published_at)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}
