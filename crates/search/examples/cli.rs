use std::sync::Arc;
use std::time::Duration;

use melody_catalog::{CatalogClient, Env};
use search::{GenreLookup, ResponseCache, SUGGESTION_DEBOUNCE, SearchSession};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let env = match Env::load() {
        Ok(env) => env,
        Err(error) => {
            eprintln!("Usage: CATALOG_BASE_URL=... cargo run --example cli");
            eprintln!();
            eprintln!("  CATALOG_BASE_URL      remote catalog URL (required)");
            eprintln!("  CATALOG_TIMEOUT_SECS  request timeout (default: 10)");
            eprintln!();
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    };

    let client = Arc::new(CatalogClient::from_env(&env).expect("invalid catalog configuration"));
    let session = SearchSession::new(Arc::clone(&client), ResponseCache::new(), SUGGESTION_DEBOUNCE);
    let genres = GenreLookup::new(client, ResponseCache::new());

    eprintln!("Type query text for live suggestions. Commands:");
    eprintln!("  /search     run an explicit search for the current query");
    eprintln!("  /pick <n>   select suggestion n");
    eprintln!("  /genres     fetch genres for the current selection");
    eprintln!("  /quit");
    eprintln!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        match line {
            "/quit" => break,
            "/search" => session.submit().await,
            "/genres" => match session.frame().selection {
                Some(track) => genres.fetch(&track.id).await,
                None => eprintln!("nothing selected"),
            },
            _ if line.starts_with("/pick") => {
                let frame = session.frame();
                let picked = line
                    .strip_prefix("/pick")
                    .and_then(|rest| rest.trim().parse::<usize>().ok())
                    .and_then(|n| frame.suggestions.get(n.saturating_sub(1)).cloned());
                match picked {
                    Some(track) => session.pick(track),
                    None => eprintln!("no such suggestion"),
                }
            }
            text => {
                session.set_query(text);
                // Let the quiet window elapse and the fetch land before
                // rendering.
                tokio::time::sleep(SUGGESTION_DEBOUNCE + Duration::from_millis(400)).await;
            }
        }
        render(&session, &genres);
    }
}

fn render(session: &SearchSession<CatalogClient>, genres: &GenreLookup<CatalogClient>) {
    let frame = session.frame();

    if frame.suggestions_visible {
        for (index, track) in frame.suggestions.iter().enumerate() {
            let artists = track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {}. {} — {}", index + 1, track.name, artists);
        }
    }

    if let Some(track) = &frame.selection {
        println!();
        println!("» {} ({})", track.name, track.duration_display());
        println!("  album: {}", track.album.name);
        if let Some(year) = track.album.release_year() {
            println!("  year: {year}");
        }
        println!("  popularity: {}%", track.popularity);
        if track.explicit {
            println!("  explicit");
        }
        if let Some(url) = &track.external_urls.spotify {
            println!("  {url}");
        }
        let genre_frame = genres.frame();
        if !genre_frame.genres.is_empty() {
            println!("  genres: {}", genre_frame.genres.join(", "));
        }
    }
}
