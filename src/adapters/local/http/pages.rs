use super::stream_url;
use crate::domain::format::StreamFormat;
use crate::domain::identity::VideoId;
use crate::error::Error;
use axum::extract::Path;
use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../../templates/index.html");
const PLAYER_HTML: &str = include_str!("../../../../templates/player.html");

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Playback page. Only well-formed ids are rendered so nothing
/// client-supplied reaches the markup.
pub(super) async fn player(Path(video_id): Path<String>) -> Result<Html<String>, Error> {
    let id: VideoId = video_id
        .parse()
        .map_err(|_| Error::not_found(format!("video {video_id}")))?;

    Ok(Html(render_player(&id)))
}

fn render_player(id: &VideoId) -> String {
    PLAYER_HTML
        .replace("{{video_id}}", &id.to_string())
        .replace("{{hls_url}}", &stream_url(id, StreamFormat::Hls))
        .replace("{{dash_url}}", &stream_url(id, StreamFormat::Dash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_page_links_both_formats() {
        let id = VideoId::new();
        let html = render_player(&id);

        assert!(html.contains(&format!("/stream/{id}/hls/playlist.m3u8")));
        assert!(html.contains(&format!("/stream/{id}/dash/manifest.mpd")));
        assert!(!html.contains("{{"));
    }
}
