//! 変更通知によるスキャンの状態機械
//!
//! `Idle → Scanning → Idle`。スキャン中に届いた通知は取りこぼしとして記録し、
//! 現在のスキャン完了後に全体スキャンを1回だけ追加で行う。

use crate::document::MutationBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
}

/// 通知に対する判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTrigger {
    /// 挿入を含まない通知
    Ignored,
    /// スキャンを開始する
    Started,
    /// スキャン中のため後続スキャンに回す
    Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct ReactiveScanner {
    state: ScanState,
    missed: bool,
    scans_completed: u64,
}

impl ReactiveScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn scans_completed(&self) -> u64 {
        self.scans_completed
    }

    /// 変更通知を受け取る
    pub fn notify(&mut self, batch: &MutationBatch) -> ScanTrigger {
        if !batch.has_insertions() {
            return ScanTrigger::Ignored;
        }
        self.begin()
    }

    /// 通知に依らずスキャンを開始する（初回スキャン用）
    pub fn begin(&mut self) -> ScanTrigger {
        match self.state {
            ScanState::Idle => {
                self.state = ScanState::Scanning;
                ScanTrigger::Started
            }
            ScanState::Scanning => {
                self.missed = true;
                ScanTrigger::Deferred
            }
        }
    }

    /// スキャン完了
    ///
    /// # Returns
    /// 取りこぼしがあり、続けてもう一度スキャンすべき場合 `true`
    /// （その場合 `Scanning` のまま）
    pub fn finish(&mut self) -> bool {
        self.scans_completed += 1;
        if std::mem::take(&mut self.missed) {
            return true;
        }
        self.state = ScanState::Idle;
        false
    }
}
