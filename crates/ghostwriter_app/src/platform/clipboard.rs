use ghost_logging::ghost_warn;

pub trait ClipboardPort {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// System clipboard. Opened lazily so headless sessions still start.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, String> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|err| {
                ghost_warn!("Clipboard unavailable: {}", err);
                err.to_string()
            })?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| "clipboard unavailable".to_string())
    }
}

impl ClipboardPort for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        self.clipboard()?
            .set_text(text.to_string())
            .map_err(|err| err.to_string())
    }
}
