//! App - アプリケーション層
//!
//! ports・store・reminder を組み合わせて、表示層から呼ばれる intents を実装します。
//!
//! # 主要コンポーネント
//! - **TicklerBuilder**: ワイヤリングと起動時の復元
//! - **Tickler**: add / delete / toggle / set_reminder の受け口

pub mod builder;
pub mod tickler;


pub use self::builder::TicklerBuilder;
pub use self::tickler::Tickler;
