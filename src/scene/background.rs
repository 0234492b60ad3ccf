// background.rs - Full-canvas backdrop image

use crate::config::Config;
use crate::render::{Asset, Canvas, ImageRef, Rect, Surface};

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundState {
    Pending,
    Ready { width: u32, height: u32 },
    Failed,
}

#[derive(Debug, Clone)]
pub struct Background {
    file: String,
    default_file: String,
    image_path: String,
    fill: u32,
    state: BackgroundState,
}

impl Background {
    /// Uses `preference` when it names an allowed image, the default otherwise.
    pub fn new(config: &Config, preference: Option<&str>) -> Self {
        let file = match preference {
            Some(name) if is_valid_name(name, &config.backgrounds) => name.to_string(),
            Some(name) => {
                log::warn!("ignoring background preference `{name}`, using {}", config.default_background);
                config.default_background.clone()
            }
            None => config.default_background.clone(),
        };

        Self {
            file,
            default_file: config.default_background.clone(),
            image_path: config.image_path.clone(),
            fill: config.background_fill,
            state: BackgroundState::Pending,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn path(&self) -> String {
        format!("{}{}", self.image_path, self.file)
    }

    pub fn state(&self) -> BackgroundState {
        self.state
    }

    pub fn on_decoded(&mut self, width: u32, height: u32) {
        if self.state == BackgroundState::Pending {
            self.state = BackgroundState::Ready { width, height };
        }
    }

    /// Returns true when the default image was substituted and should be
    /// decoded next. A failing default leaves the flat fill for good.
    pub fn on_decode_failed(&mut self) -> bool {
        log::error!("failed to load background image: {}", self.path());

        if self.file != self.default_file {
            self.file = self.default_file.clone();
            self.state = BackgroundState::Pending;
            return true;
        }
        self.state = BackgroundState::Failed;
        false
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, canvas: Canvas) {
        let dst = canvas.bounds();

        if let BackgroundState::Ready { width, height } = self.state {
            if width == 0 || height == 0 {
                surface.fill_rect(dst, self.fill);
                return;
            }
            let image = ImageRef { asset: Asset::Background, width, height };
            let src = Rect::new(0.0, 0.0, width as f64, height as f64);
            match surface.draw_image(image, src, dst) {
                Ok(()) => return,
                Err(err) => {
                    log::error!("error drawing background {}: {err}", self.path());
                    self.state = BackgroundState::Failed;
                }
            }
        }

        surface.fill_rect(dst, self.fill);
    }
}

fn is_valid_name(name: &str, allowed: &[String]) -> bool {
    if !allowed.is_empty() {
        return allowed.iter().any(|a| a == name);
    }
    let lower = name.to_ascii_lowercase();
    !name.contains(['/', '\\'])
        && !name.starts_with('.')
        && IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext) && lower.len() > ext.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Encoder, OP_BACKGROUND, OP_FILL};

    const CANVAS: Canvas = Canvas { width: 800.0, height: 600.0 };

    #[test]
    fn missing_preference_uses_default() {
        let bg = Background::new(&Config::default(), None);
        assert_eq!(bg.path(), "frontend/assets/images/china-bg.jpg");
    }

    #[test]
    fn malformed_preference_uses_default() {
        let config = Config::default();
        for bad in ["", "../secret.jpg", "dir/bg.png", "notes.txt", ".jpg"] {
            assert_eq!(Background::new(&config, Some(bad)).file(), "china-bg.jpg", "{bad}");
        }
        assert_eq!(Background::new(&config, Some("dojo.PNG")).file(), "dojo.PNG");
    }

    #[test]
    fn allow_list_is_enforced() {
        let mut config = Config::default();
        config.backgrounds = vec!["dojo.jpg".into()];
        assert_eq!(Background::new(&config, Some("dojo.jpg")).file(), "dojo.jpg");
        assert_eq!(Background::new(&config, Some("beach.jpg")).file(), "china-bg.jpg");
    }

    #[test]
    fn flat_fill_until_decoded() {
        let mut bg = Background::new(&Config::default(), None);
        let mut enc = Encoder::new(800, 600);
        bg.draw(&mut enc, CANVAS);
        let cmd = enc.iter().next().unwrap();
        assert_eq!(cmd[0], OP_FILL);
        assert_eq!(cmd[1] as u32, 0x29_45_52);

        bg.on_decoded(1600, 900);
        enc.clear();
        bg.draw(&mut enc, CANVAS);
        let cmd = enc.iter().next().unwrap();
        assert_eq!(cmd[0], OP_BACKGROUND);
        assert_eq!(&cmd[7..11], &[0.0, 0.0, 800.0, 600.0]);
    }

    #[test]
    fn failed_preference_retries_default_once() {
        let mut bg = Background::new(&Config::default(), Some("dojo.jpg"));
        assert!(bg.on_decode_failed());
        assert_eq!(bg.file(), "china-bg.jpg");
        assert_eq!(bg.state(), BackgroundState::Pending);

        assert!(!bg.on_decode_failed());
        assert_eq!(bg.state(), BackgroundState::Failed);

        let mut enc = Encoder::new(800, 600);
        bg.draw(&mut enc, CANVAS);
        assert_eq!(enc.iter().next().unwrap()[0], OP_FILL);
    }
}
