//! API lookup commands.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::OutputFormat;
use crate::search::{Album, ApiMethod, Artist, Filters, ItunesApi, Params, Track};

/// List the songs on one or more albums
pub async fn cmd_tracks<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    album_ids: &[u64],
    limit: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tracks = api.get_tracks_for_albums(album_ids, limit).await?;
    print_results(out, &tracks, format, format_track)
}

/// List the albums of an artist
pub async fn cmd_albums<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    artist_id: u64,
    limit: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let albums = api.get_albums_for_artist(artist_id, limit).await?;
    print_results(out, &albums, format, format_album)
}

/// Find an album by artist and album name
pub async fn cmd_album<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    artist: &str,
    name: &str,
    limit: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let albums = api.get_album_with_artist(artist, name, limit).await?;
    print_results(out, &albums, format, format_album)
}

/// Find artist ids by name
pub async fn cmd_artist_id<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    name: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let artists = api.get_id_for_artist(name).await?;
    print_results(out, &artists, format, format_artist)
}

/// Find songs by name
pub async fn cmd_search_tracks<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    term: &str,
    limit: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tracks = api.search_tracks(term, limit).await?;
    print_results(out, &tracks, format, format_track)
}

/// Call the API directly; raw results are always printed as JSON
pub async fn cmd_raw<A: ItunesApi>(
    api: &A,
    out: &mut impl Write,
    method: ApiMethod,
    params: &[(String, String)],
    filters: &[(String, String)],
) -> anyhow::Result<()> {
    let params: Params = params.iter().cloned().collect();
    let filters: Filters = filters
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let results = api.perform_api_call(method, params, filters).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
    Ok(())
}

fn print_results<T: Serialize>(
    out: &mut impl Write,
    items: &[T],
    format: OutputFormat,
    line: fn(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        }
        OutputFormat::Text if items.is_empty() => {
            writeln!(out, "No results.")?;
        }
        OutputFormat::Text => {
            for item in items {
                writeln!(out, "{}", line(item))?;
            }
        }
    }
    Ok(())
}

fn format_track(track: &Track) -> String {
    let mut line = format!("{:>12}  ", track.id);
    if let Some(ref artist) = track.artist_name {
        line.push_str(artist);
        line.push_str(" - ");
    }
    line.push_str(&track.name);
    if let Some(ref album) = track.album_name {
        line.push_str(&format!(" ({})", album));
    }
    if let Some(duration) = track.duration {
        line.push_str(&format!(" [{}]", format_duration(duration)));
    }
    line
}

fn format_album(album: &Album) -> String {
    let mut line = format!("{:>12}  ", album.id);
    if let Some(ref artist) = album.artist_name {
        line.push_str(artist);
        line.push_str(" - ");
    }
    line.push_str(&album.name);

    let details: Vec<String> = [
        album.release_year().map(|y| y.to_string()),
        album.track_count.map(|n| format!("{} tracks", n)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}

fn format_artist(artist: &Artist) -> String {
    match artist.genre {
        Some(ref genre) => format!("{:>12}  {} [{}]", artist.id, artist.name, genre),
        None => format!("{:>12}  {}", artist.id, artist.name),
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItunesError;
    use crate::search::traits::mocks::MockItunes;
    use serde_json::json;

    fn track() -> Track {
        Track {
            id: 879273565,
            name: "Better Together".to_string(),
            artist_id: Some(909253),
            artist_name: Some("Jack Johnson".to_string()),
            album_id: Some(879273552),
            album_name: Some("In Between Dreams".to_string()),
            track_number: Some(1),
            track_count: Some(15),
            disc_number: Some(1),
            duration: Some(Duration::from_millis(207679)),
            genre: Some("Rock".to_string()),
            release_date: None,
            explicit: false,
            price: Some(1.29),
            currency: Some("USD".to_string()),
            preview_url: None,
            view_url: None,
            artwork_url: None,
        }
    }

    fn album() -> Album {
        Album {
            id: 879273552,
            name: "In Between Dreams".to_string(),
            artist_id: Some(909253),
            artist_name: Some("Jack Johnson".to_string()),
            track_count: Some(15),
            genre: None,
            release_date: chrono::DateTime::parse_from_rfc3339("2005-03-01T08:00:00Z")
                .ok()
                .map(|d| d.with_timezone(&chrono::Utc)),
            explicit: false,
            price: None,
            currency: None,
            copyright: None,
            view_url: None,
            artwork_url: None,
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(207)), "3:27");
        assert_eq!(format_duration(Duration::from_secs(5)), "0:05");
    }

    #[test]
    fn test_format_track_line() {
        assert_eq!(
            format_track(&track()),
            "   879273565  Jack Johnson - Better Together (In Between Dreams) [3:27]"
        );
    }

    #[test]
    fn test_format_album_line() {
        assert_eq!(
            format_album(&album()),
            "   879273552  Jack Johnson - In Between Dreams (2005, 15 tracks)"
        );
    }

    #[tokio::test]
    async fn test_cmd_tracks_text() {
        let mock = MockItunes::with_tracks(vec![track()]);
        let mut buf = Vec::new();

        cmd_tracks(&mock, &mut buf, &[879273552], None, OutputFormat::Text)
            .await
            .unwrap();

        assert!(output(buf).contains("Better Together"));
        assert_eq!(mock.calls(), vec!["tracks_for_albums([879273552])".to_string()]);
    }

    #[tokio::test]
    async fn test_cmd_albums_json() {
        let mock = MockItunes::with_albums(vec![album()]);
        let mut buf = Vec::new();

        cmd_albums(&mock, &mut buf, 909253, Some(5), OutputFormat::Json)
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(parsed[0]["id"], 879273552);
        assert_eq!(parsed[0]["name"], "In Between Dreams");
    }

    #[tokio::test]
    async fn test_cmd_artist_id_empty() {
        let mock = MockItunes::default();
        let mut buf = Vec::new();

        cmd_artist_id(&mock, &mut buf, "nobody", OutputFormat::Text)
            .await
            .unwrap();
        assert_eq!(output(buf), "No results.\n");
    }

    #[tokio::test]
    async fn test_cmd_propagates_api_error() {
        let mock = MockItunes::with_error(ItunesError::RateLimited);
        let mut buf = Vec::new();

        let err = cmd_search_tracks(&mock, &mut buf, "abba", None, OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Rate limited"));
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_cmd_raw_prints_json() {
        let mock = MockItunes::with_raw(vec![json!({"wrapperType": "track", "trackId": 1})]);
        let mut buf = Vec::new();

        cmd_raw(
            &mock,
            &mut buf,
            ApiMethod::Search,
            &[("term".to_string(), "abba".to_string())],
            &[("wrapperType".to_string(), "track".to_string())],
        )
        .await
        .unwrap();

        let parsed: Value = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(parsed[0]["trackId"], 1);
        assert_eq!(mock.calls(), vec![r#"search({"term": "abba"})"#.to_string()]);
    }
}
