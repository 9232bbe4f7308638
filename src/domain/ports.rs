use crate::utils::error::Result;

/// 外部訓練好的二元分類器；載入後唯讀，可跨請求共用
pub trait Classifier: Send + Sync {
    /// 輸入 `[cgpa, iq]`，回傳類別標籤 0 或 1
    fn predict(&self, features: &[f64; 2]) -> Result<u8>;

    fn describe(&self) -> String {
        "classifier".to_string()
    }
}
