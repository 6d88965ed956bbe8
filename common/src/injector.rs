//! 表示切替トグルの挿入（有限回リトライ）
//!
//! ホストのレイアウトが非同期に読み込まれるため、アンカーが現れるまで
//! 一定間隔で再試行する。最後の試行でもアンカーが無ければフローティング
//! 表示に切り替え、それも失敗すれば諦める（フィルタ自体は動き続ける）。

use crate::dom::TemplateVariant;
use std::time::Duration;

/// トグルを配置する能力（ホスト側で実装）
pub trait ToggleHost {
    /// トグルが既にドキュメント上に存在するか
    fn control_present(&self) -> bool;

    /// テンプレートのアンカーに配置する（アンカーが無ければ `false`）
    fn mount_at_anchor(&self, variant: TemplateVariant, checked: bool) -> bool;

    /// 画面隅の固定表示として配置する
    fn mount_floating(&self, checked: bool) -> bool;
}

/// 再試行の方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_millis(500),
        }
    }
}

/// トグルの配置先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Anchor(TemplateVariant),
    Floating,
    /// 既存のトグルを採用
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorState {
    Uninjected { attempts: u32 },
    Injected(Placement),
    Exhausted,
}

/// 1回の試行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 既に配置済み（何もしない）
    AlreadyPresent,
    Injected(Placement),
    /// `interval` 後に再試行する
    RetryLater,
    /// 試行回数を使い切った
    GaveUp,
}

impl AttemptOutcome {
    /// 以降の再試行が不要か
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptOutcome::RetryLater)
    }
}

#[derive(Debug, Clone)]
pub struct ToggleInjector {
    policy: RetryPolicy,
    state: InjectorState,
}

impl ToggleInjector {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: InjectorState::Uninjected { attempts: 0 },
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn state(&self) -> InjectorState {
        self.state
    }

    /// 配置を1回試みる
    pub fn attempt<H: ToggleHost>(&mut self, host: &H, checked: bool) -> AttemptOutcome {
        let attempts = match self.state {
            InjectorState::Injected(_) => return AttemptOutcome::AlreadyPresent,
            InjectorState::Exhausted => return AttemptOutcome::GaveUp,
            InjectorState::Uninjected { attempts } => attempts + 1,
        };

        if host.control_present() {
            self.state = InjectorState::Injected(Placement::Existing);
            return AttemptOutcome::AlreadyPresent;
        }

        for variant in TemplateVariant::PRIORITY {
            if host.mount_at_anchor(variant, checked) {
                return self.injected(Placement::Anchor(variant));
            }
        }

        if attempts < self.policy.max_attempts {
            self.state = InjectorState::Uninjected { attempts };
            return AttemptOutcome::RetryLater;
        }

        if host.mount_floating(checked) {
            return self.injected(Placement::Floating);
        }

        tracing::warn!(attempts, "toggle injection gave up");
        self.state = InjectorState::Exhausted;
        AttemptOutcome::GaveUp
    }

    /// 配置済みのトグルが消えていないか確認する
    ///
    /// # Returns
    /// トグルが消えて再挿入が必要になった場合 `true`
    pub fn check_presence<H: ToggleHost>(&mut self, host: &H) -> bool {
        if matches!(self.state, InjectorState::Injected(_)) && !host.control_present() {
            tracing::debug!("toggle removed by host, re-injecting");
            self.state = InjectorState::Uninjected { attempts: 0 };
            return true;
        }
        false
    }

    fn injected(&mut self, placement: Placement) -> AttemptOutcome {
        tracing::debug!(?placement, "toggle injected");
        self.state = InjectorState::Injected(placement);
        AttemptOutcome::Injected(placement)
    }
}

impl Default for ToggleInjector {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// 配置呼び出しを数えるホスト
    #[derive(Default)]
    struct CountingHost {
        anchor_available_after: Option<u32>,
        floating_works: bool,
        present: Cell<bool>,
        anchor_calls: Cell<u32>,
        floating_calls: Cell<u32>,
    }

    impl ToggleHost for CountingHost {
        fn control_present(&self) -> bool {
            self.present.get()
        }

        fn mount_at_anchor(&self, variant: TemplateVariant, _checked: bool) -> bool {
            self.anchor_calls.set(self.anchor_calls.get() + 1);
            let attempt = self.anchor_calls.get().div_ceil(2);
            let ok = variant == TemplateVariant::Legacy
                && self.anchor_available_after.is_some_and(|n| attempt >= n);
            if ok {
                self.present.set(true);
            }
            ok
        }

        fn mount_floating(&self, _checked: bool) -> bool {
            self.floating_calls.set(self.floating_calls.get() + 1);
            if self.floating_works {
                self.present.set(true);
            }
            self.floating_works
        }
    }

    fn run_until_terminal(injector: &mut ToggleInjector, host: &CountingHost) -> (AttemptOutcome, u32) {
        let mut rounds = 0;
        loop {
            rounds += 1;
            let outcome = injector.attempt(host, false);
            if outcome.is_terminal() {
                return (outcome, rounds);
            }
        }
    }

    #[test]
    fn test_anchor_found_on_first_attempt() {
        let host = CountingHost {
            anchor_available_after: Some(1),
            ..Default::default()
        };
        let mut injector = ToggleInjector::default();

        let outcome = injector.attempt(&host, true);
        assert_eq!(outcome, AttemptOutcome::Injected(Placement::Anchor(TemplateVariant::Legacy)));
        assert_eq!(host.floating_calls.get(), 0);
    }

    #[test]
    fn test_anchor_appears_later() {
        let host = CountingHost {
            anchor_available_after: Some(4),
            ..Default::default()
        };
        let mut injector = ToggleInjector::default();

        let (outcome, rounds) = run_until_terminal(&mut injector, &host);
        assert_eq!(outcome, AttemptOutcome::Injected(Placement::Anchor(TemplateVariant::Legacy)));
        assert_eq!(rounds, 4);
    }

    #[test]
    fn test_bounded_retry_without_anchor() {
        let host = CountingHost::default();
        let mut injector = ToggleInjector::new(RetryPolicy {
            max_attempts: 10,
            interval: Duration::from_millis(500),
        });

        let (outcome, rounds) = run_until_terminal(&mut injector, &host);
        assert_eq!(outcome, AttemptOutcome::GaveUp);
        assert_eq!(rounds, 10);
        // 1試行につきバリアント数分のアンカー探索
        assert_eq!(host.anchor_calls.get(), 20);
        assert_eq!(host.floating_calls.get(), 1);

        // 使い切った後は何も呼ばない
        assert_eq!(injector.attempt(&host, false), AttemptOutcome::GaveUp);
        assert_eq!(host.anchor_calls.get(), 20);
        assert_eq!(host.floating_calls.get(), 1);
        assert_eq!(injector.state(), InjectorState::Exhausted);
    }

    #[test]
    fn test_floating_fallback_on_last_attempt() {
        let host = CountingHost {
            floating_works: true,
            ..Default::default()
        };
        let mut injector = ToggleInjector::new(RetryPolicy {
            max_attempts: 3,
            interval: Duration::from_millis(10),
        });

        let (outcome, rounds) = run_until_terminal(&mut injector, &host);
        assert_eq!(outcome, AttemptOutcome::Injected(Placement::Floating));
        assert_eq!(rounds, 3);
    }

    #[test]
    fn test_no_duplicate_control() {
        let host = CountingHost {
            anchor_available_after: Some(1),
            ..Default::default()
        };
        let mut injector = ToggleInjector::default();
        injector.attempt(&host, false);
        let calls = host.anchor_calls.get();

        assert_eq!(injector.attempt(&host, false), AttemptOutcome::AlreadyPresent);
        assert_eq!(host.anchor_calls.get(), calls);
    }

    #[test]
    fn test_adopts_existing_control() {
        let host = CountingHost::default();
        host.present.set(true);
        let mut injector = ToggleInjector::default();

        assert_eq!(injector.attempt(&host, false), AttemptOutcome::AlreadyPresent);
        assert_eq!(injector.state(), InjectorState::Injected(Placement::Existing));
        assert_eq!(host.anchor_calls.get(), 0);
    }

    #[test]
    fn test_reinjection_after_removal() {
        let host = CountingHost {
            anchor_available_after: Some(1),
            ..Default::default()
        };
        let mut injector = ToggleInjector::default();
        injector.attempt(&host, false);
        assert!(!injector.check_presence(&host));

        // ホストが構造を丸ごと差し替えた
        host.present.set(false);
        assert!(injector.check_presence(&host));
        assert_eq!(injector.state(), InjectorState::Uninjected { attempts: 0 });
        assert!(matches!(injector.attempt(&host, false), AttemptOutcome::Injected(_)));
    }
}
