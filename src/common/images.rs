// src/common/images.rs

use std::io::Cursor;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{io::Reader, DynamicImage, ImageFormat, ImageOutputFormat, Rgb, RgbImage};

use crate::common::error::AppError;

/// Tamanho máximo aceito para uma imagem decodificada (5MB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Limite do corpo JSON nas rotas de upload: o base64 de MAX_IMAGE_BYTES mais o envelope.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Largura x altura máxima. Só o cabeçalho é lido, a imagem nunca é decodificada.
const MAX_IMAGE_PIXELS: u64 = 40_000_000;

const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([208, 215, 222]);

/// Decodifica o base64 recebido e garante que é uma imagem suportada.
pub fn decode_upload(encoded: &str) -> Result<Vec<u8>, AppError> {
    // Aceita também o formato "data:image/png;base64,...."
    let payload = match encoded.split_once(";base64,") {
        Some((_, data)) => data,
        None => encoded,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::InvalidInput("Image is not valid base64.".into()))?;

    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Image is empty.".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidInput("Image exceeds the 5MB limit.".into()));
    }

    check_dimensions(&bytes, MAX_IMAGE_PIXELS)?;

    Ok(bytes)
}

fn unsupported() -> AppError {
    AppError::InvalidInput("Uploaded data is not a supported image.".into())
}

fn check_dimensions(bytes: &[u8], max_pixels: u64) -> Result<(), AppError> {
    if content_type_of(bytes).is_none() {
        return Err(unsupported());
    }

    let (width, height) = Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| unsupported())?
        .into_dimensions()
        .map_err(|_| unsupported())?;

    if width == 0 || height == 0 {
        return Err(unsupported());
    }
    if u64::from(width) * u64::from(height) > max_pixels {
        return Err(AppError::InvalidInput(format!(
            "Image dimensions {}x{} are too large.",
            width, height
        )));
    }
    Ok(())
}

fn content_type_of(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

/// PNG cinza usado quando a entidade não tem imagem (ou a imagem salva está corrompida).
pub fn placeholder_png() -> Result<Vec<u8>, AppError> {
    let canvas = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR);
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| anyhow::anyhow!("Failed to render placeholder image: {}", e))?;
    Ok(buffer)
}

/// Monta a resposta binária. Nunca falha por causa da imagem em si:
/// se não existir ou não for reconhecível, serve o placeholder.
pub fn image_response(stored: Option<Vec<u8>>) -> Result<Response, AppError> {
    if let Some(bytes) = stored {
        if let Some(mime) = content_type_of(&bytes) {
            return Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response());
        }
        tracing::warn!("Stored image has an unknown format, serving placeholder");
    }

    let placeholder = placeholder_png()?;
    Ok(([(header::CONTENT_TYPE, "image/png")], placeholder).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_png() {
        let bytes = placeholder_png().unwrap();
        assert_eq!(content_type_of(&bytes), Some("image/png"));
    }

    #[test]
    fn decode_upload_accepts_data_urls() {
        let png = placeholder_png().unwrap();
        let encoded = format!("data:image/png;base64,{}", STANDARD.encode(&png));
        assert_eq!(decode_upload(&encoded).unwrap(), png);
    }

    #[test]
    fn decode_upload_rejects_garbage() {
        assert!(matches!(decode_upload("%%%not base64%%%"), Err(AppError::InvalidInput(_))));

        let not_an_image = STANDARD.encode(b"just some text");
        assert!(matches!(decode_upload(&not_an_image), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn oversized_dimensions_are_rejected_from_the_header() {
        let png = placeholder_png().unwrap();
        assert!(check_dimensions(&png, 64 * 64).is_ok());

        let err = check_dimensions(&png, 64 * 63).unwrap_err();
        assert_eq!(err.to_string(), "Image dimensions 64x64 are too large.");
    }

    #[test]
    fn body_limit_fits_the_largest_upload() {
        // base64 ocupa 4 bytes a cada 3, mais o envelope {"image": "data:...;base64,"}
        let encoded = MAX_IMAGE_BYTES.div_ceil(3) * 4;
        assert!(encoded + 1024 <= UPLOAD_BODY_LIMIT);
    }

    #[test]
    fn unknown_stored_bytes_fall_back_to_placeholder() {
        let response = image_response(Some(b"garbage".to_vec())).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let response = image_response(None).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }
}
