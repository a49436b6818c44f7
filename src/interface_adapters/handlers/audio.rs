use crate::domain::errors::StreamError;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::state::AppState;
use crate::use_cases::stream_audio::{AUDIO_CONTENT_TYPE, AudioStream};
use axum::{
    body::Body,
    extract::{Path as PathParam, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE},
    },
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use std::path::{Component, Path, PathBuf};

// Handler for streaming a stored audio file, honoring `Range`.
#[tracing::instrument(name = "stream_audio", skip_all, fields(file_name = %file_name))]
pub async fn stream_audio(
    State(state): State<AppState>,
    PathParam(file_name): PathParam<String>,
    headers: HeaderMap,
) -> Response {
    let Some(path) = resolve_audio_path(&state.audio_dir, &file_name) else {
        tracing::debug!("rejected audio file name");
        return error_response(StatusCode::NOT_FOUND, "audio not found").into_response();
    };

    // A non-ASCII header value can never match the range grammar.
    let range = headers
        .get(RANGE)
        .map(|value| value.to_str().unwrap_or_default());

    match state.stream.execute(&path, range).await {
        Ok(stream) => audio_response(stream),
        Err(err) => map_stream_error(err),
    }
}

// Joins a single plain file name onto the audio root.
//
// Anything with separators, `..`, or a root prefix is refused so requests
// cannot leave the audio directory.
fn resolve_audio_path(audio_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(audio_dir.join(name)),
        _ => None,
    }
}

fn audio_response(stream: AudioStream) -> Response {
    let status = match stream.content_range() {
        Some(_) => StatusCode::PARTIAL_CONTENT,
        None => StatusCode::OK,
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE));
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(stream.content_length()));
    if let Some(content_range) = stream.content_range() {
        if let Ok(value) = HeaderValue::from_str(&content_range) {
            headers.insert(CONTENT_RANGE, value);
        }
    }

    let body = stream.body.inspect_err(|err| {
        tracing::warn!(error = %err, "audio stream aborted mid-transfer");
    });

    (status, headers, Body::from_stream(body)).into_response()
}

fn map_stream_error(err: StreamError) -> Response {
    match err {
        StreamError::NotFound => {
            error_response(StatusCode::NOT_FOUND, "audio not found").into_response()
        }
        StreamError::MalformedRange { file_size }
        | StreamError::UnsatisfiableRange { file_size } => {
            tracing::debug!(error = %err, "range not satisfiable");
            let unsatisfied = format!("bytes */{file_size}");
            let mut response =
                error_response(StatusCode::RANGE_NOT_SATISFIABLE, "range not satisfiable")
                    .into_response();
            if let Ok(value) = HeaderValue::from_str(&unsatisfied) {
                response.headers_mut().insert(CONTENT_RANGE, value);
            }
            response.headers_mut().insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
            response
        }
        StreamError::Io(io_err) => {
            tracing::error!(error = %io_err, "failed to open audio file");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "audio unavailable").into_response()
        }
    }
}
