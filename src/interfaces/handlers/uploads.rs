use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// Pulls the `file` field out of a multipart body, enforcing the size cap.
async fn read_file_field(mut payload: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::validation("file", &format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.to_string())
            .ok_or_else(|| AppError::validation("file", "Missing filename"))?;

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::validation("file", &format!("Failed to read upload: {}", e)))?
        {
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::validation("file", "File exceeds the 10 MB limit"));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(AppError::validation("file", "Empty file"));
        }

        return Ok(UploadedFile { filename, bytes });
    }

    Err(AppError::validation("file", "No file field in request"))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[instrument(skip(claims, state, payload))]
#[post("/photo")]
pub async fn upload_photo(
    claims: AuthClaims,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;
    let file = read_file_field(payload).await?;

    // Sniff the real content type; the client-supplied one is not trusted.
    let kind = infer::get(&file.bytes)
        .ok_or_else(|| AppError::validation("file", "Unrecognized file type"))?;
    if !kind.mime_type().starts_with("image/") {
        return Err(AppError::validation("file", "Photo must be an image"));
    }

    let path = photo_path(&caller_id, kind.extension());

    state
        .storage
        .upload(
            &state.buckets.photos,
            &path,
            file.bytes,
            kind.mime_type(),
        )
        .await?;

    let public_url = state.storage.public_url(&state.buckets.photos, &path);

    Ok(HttpResponse::Ok().json(serde_json::json!({"publicUrl": public_url})))
}

#[instrument(skip(claims, state, payload))]
#[post("/resume")]
pub async fn upload_resume(
    claims: AuthClaims,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let caller_id = claims.user_id()?;
    let file = read_file_field(payload).await?;

    let kind = infer::get(&file.bytes)
        .ok_or_else(|| AppError::validation("file", "Unrecognized file type"))?;
    if kind.mime_type() != "application/pdf" {
        return Err(AppError::validation("file", "Resume must be a PDF"));
    }

    let path = format!("{}/{}", caller_id, sanitize_filename(&file.filename));

    state
        .storage
        .upload(
            &state.buckets.resumes,
            &path,
            file.bytes,
            "application/pdf",
        )
        .await?;

    let public_url = state.storage.public_url(&state.buckets.resumes, &path);

    Ok(HttpResponse::Ok().json(serde_json::json!({"publicUrl": public_url})))
}

/// Photos are keyed by owner so a re-upload replaces the previous one.
fn photo_path(owner: &Uuid, extension: &str) -> String {
    format!("{}/{}.{}", owner, owner, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("resume 2024.pdf"), "resume_2024.pdf");
    }

    #[test]
    fn photo_path_is_stable_per_owner() {
        let owner = Uuid::nil();
        assert_eq!(
            photo_path(&owner, "png"),
            format!("{}/{}.png", owner, owner)
        );
    }
}
