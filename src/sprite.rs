use crate::dexbase::Session;

use bytes::Bytes;
use futures_util::TryFutureExt;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::task;

#[derive(Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Bytes,
}

impl Image {
    /// Loads a sprite from the disk cache, downloading it on a miss.
    pub async fn fetch(url: String, session: Session) -> Result<Image, anywho::Error> {
        let cache = cache_dir().join(file_name(&url));

        let fetch_from_cache = async {
            let bytes = fs::read(&cache).await?;

            Ok(Bytes::from(bytes))
        };

        let download_sprite = async {
            let bytes = session.download(&url).await?;

            Ok::<_, anywho::Error>(bytes)
        };

        let bytes = fetch_from_cache
            .or_else(|_: anywho::Error| download_sprite)
            .await?;

        if !fs::try_exists(&cache).await.unwrap_or_default() {
            let _ = fs::create_dir_all(cache.parent().unwrap_or(&cache)).await;
            let _ = fs::write(&cache, &bytes).await;
        }

        // Decode image as RGBA in a background blocking thread
        task::spawn_blocking(move || {
            let image = image::ImageReader::new(io::Cursor::new(bytes))
                .with_guessed_format()?
                .decode()?
                .to_rgba8();

            Ok(Image {
                width: image.width(),
                height: image.height(),
                rgba: Bytes::from(image.into_raw()),
            })
        })
        .await?
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba", &self.rgba.len())
            .finish()
    }
}

/// Flattens a sprite URL into a unique file name.
fn file_name(url: &str) -> String {
    url.split_once("://")
        .map_or(url, |(_scheme, rest)| rest)
        .replace(|c: char| !c.is_ascii_alphanumeric() && c != '.' && c != '-', "_")
}

fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_default()
        .join(env!("CARGO_PKG_NAME"))
        .join("sprites")
}
