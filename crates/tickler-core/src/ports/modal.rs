//! ModalPresenter port - ページ内モーダル（最後の砦）

/// The in-page alert. Infallible: it is the channel every other delivery
/// path falls back to.
pub trait ModalPresenter: Send + Sync {
    fn show_modal(&self, text: &str);
}
