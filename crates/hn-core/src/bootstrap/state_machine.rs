//! Bootstrap state machine.
//!
//! Defines a pure state transition function for the cold-start session
//! resolution flow. Side effects live in the application layer, which
//! executes the returned actions and feeds their outcomes back in as
//! events.

use tracing::warn;

use crate::auth::{StoredSession, UserProfile};
use crate::bootstrap::failure::BootstrapFailure;
use crate::bootstrap::result::AppBootstrapResult;
use crate::ids::UserId;
use crate::push::{PermissionStatus, PushToken};

/// Facts gathered before the resolver starts: the permission answer and
/// the push token, both already degraded to their fallback values.
///
/// 启动前收集到的事实：权限结果与推送令牌。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    pub permission: PermissionStatus,
    pub push_token: Option<PushToken>,
}

/// Bootstrap flow state.
///
/// 引导流程状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    /// Nothing has happened yet.
    Start,
    /// Waiting for the onboarding flag read.
    ///
    /// 等待读取引导完成标记。
    CheckingOnboarding { launch: LaunchContext },
    /// Waiting for the stored session read.
    ///
    /// 等待读取本地会话。
    CheckingToken {
        launch: LaunchContext,
        onboarding_completed: bool,
    },
    /// Token looked valid locally; waiting for the backend to confirm.
    ///
    /// 本地令牌有效，等待后端确认。
    FetchingProfile {
        launch: LaunchContext,
        onboarding_completed: bool,
    },
    /// Session confirmed; pushing the device token to the backend.
    ///
    /// 会话已确认，正在上报推送令牌。
    RegisteringPushToken {
        permission: PermissionStatus,
        profile: UserProfile,
    },
    /// Terminal: a result was committed.
    Ready,
    /// Terminal: an unrecoverable step failed and the safe default was
    /// committed.
    Failed,
}

impl BootstrapState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// The permission answer threaded through the flow, once known.
    pub fn permission(&self) -> Option<PermissionStatus> {
        match self {
            Self::Start | Self::Ready | Self::Failed => None,
            Self::CheckingOnboarding { launch }
            | Self::CheckingToken { launch, .. }
            | Self::FetchingProfile { launch, .. } => Some(launch.permission),
            Self::RegisteringPushToken { permission, .. } => Some(*permission),
        }
    }
}

/// Events that drive the bootstrap flow. Each is the outcome of one
/// executed action.
///
/// 驱动引导流程的事件，对应各动作的执行结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapEvent {
    /// The app process came up and pre-flight facts were gathered.
    Launched {
        permission: PermissionStatus,
        push_token: Option<PushToken>,
    },
    /// The onboarding flag was read. Absence reads as `false`.
    OnboardingFlagLoaded { completed: bool },
    /// The stored session was read. `None` means no token on disk.
    SessionLoaded { session: Option<StoredSession> },
    /// The backend accepted the token and returned the profile.
    ProfileFetched { profile: UserProfile },
    /// The backend rejected the token or was unreachable.
    ProfileFetchFailed { failure: BootstrapFailure },
    /// The push token was registered with the backend.
    PushTokenRegistered,
    /// Push registration failed. Best-effort; the session stands.
    PushTokenRegistrationFailed { failure: BootstrapFailure },
    /// A step failed in a way that has no per-step degradation.
    StepFailed { failure: BootstrapFailure },
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapAction {
    /// Read the onboarding-completed flag from durable storage.
    LoadOnboardingFlag,
    /// Read the persisted session token and expiry.
    LoadStoredSession,
    /// Validate the session against the backend by fetching the profile.
    FetchProfile,
    /// Destroy the persisted token. Issued the moment it is known invalid.
    ClearStoredSession,
    /// Register the device push token for this customer.
    RegisterPushToken { user_id: UserId, token: String },
    /// Publish the final result. Exactly one per run.
    Commit { result: AppBootstrapResult },
}

/// Pure bootstrap state machine.
///
/// 纯状态机：不包含副作用。
///
/// `now_ms` is passed in rather than read from a clock so token expiry
/// decisions stay deterministic under test.
pub struct BootstrapMachine;

impl BootstrapMachine {
    pub fn transition(
        state: BootstrapState,
        event: BootstrapEvent,
        now_ms: i64,
    ) -> (BootstrapState, Vec<BootstrapAction>) {
        match (state, event) {
            (BootstrapState::Start, BootstrapEvent::Launched {
                permission,
                push_token,
            }) => (
                BootstrapState::CheckingOnboarding {
                    launch: LaunchContext {
                        permission,
                        push_token,
                    },
                },
                vec![BootstrapAction::LoadOnboardingFlag],
            ),
            (
                BootstrapState::CheckingOnboarding { launch },
                BootstrapEvent::OnboardingFlagLoaded { completed },
            ) => (
                BootstrapState::CheckingToken {
                    launch,
                    onboarding_completed: completed,
                },
                vec![BootstrapAction::LoadStoredSession],
            ),
            (
                BootstrapState::CheckingToken {
                    launch,
                    onboarding_completed,
                },
                BootstrapEvent::SessionLoaded { session },
            ) => match session {
                Some(session) if session.is_valid_at(now_ms) => (
                    BootstrapState::FetchingProfile {
                        launch,
                        onboarding_completed,
                    },
                    vec![BootstrapAction::FetchProfile],
                ),
                // A token that is expired, or stored without an expiry, is
                // destroyed the moment it is detected.
                Some(_) => (
                    BootstrapState::Ready,
                    vec![
                        BootstrapAction::ClearStoredSession,
                        BootstrapAction::Commit {
                            result: AppBootstrapResult::logged_out(
                                onboarding_completed,
                                launch.permission,
                            ),
                        },
                    ],
                ),
                None => (
                    BootstrapState::Ready,
                    vec![BootstrapAction::Commit {
                        result: AppBootstrapResult::logged_out(
                            onboarding_completed,
                            launch.permission,
                        ),
                    }],
                ),
            },
            (
                BootstrapState::FetchingProfile { launch, .. },
                BootstrapEvent::ProfileFetched { profile },
            ) => match launch.push_token {
                Some(token) => (
                    BootstrapState::RegisteringPushToken {
                        permission: launch.permission,
                        profile: profile.clone(),
                    },
                    vec![BootstrapAction::RegisterPushToken {
                        user_id: profile.id,
                        token: token.value,
                    }],
                ),
                None => (
                    BootstrapState::Ready,
                    vec![BootstrapAction::Commit {
                        result: AppBootstrapResult::logged_in(profile, launch.permission),
                    }],
                ),
            },
            // The backend would not vouch for the token. Whatever the cause,
            // the stored session is destroyed and the run finishes logged
            // out with the onboarding flag it already gathered.
            (
                BootstrapState::FetchingProfile {
                    launch,
                    onboarding_completed,
                },
                BootstrapEvent::ProfileFetchFailed { .. },
            ) => (
                BootstrapState::Ready,
                vec![
                    BootstrapAction::ClearStoredSession,
                    BootstrapAction::Commit {
                        result: AppBootstrapResult::logged_out(
                            onboarding_completed,
                            launch.permission,
                        ),
                    },
                ],
            ),
            (
                BootstrapState::RegisteringPushToken { permission, profile },
                BootstrapEvent::PushTokenRegistered,
            ) => (
                BootstrapState::Ready,
                vec![BootstrapAction::Commit {
                    result: AppBootstrapResult::logged_in(profile, permission),
                }],
            ),
            // Registration is best-effort: the session is still good, the
            // token will be retried on the next rotation or cold start.
            (
                BootstrapState::RegisteringPushToken { permission, profile },
                BootstrapEvent::PushTokenRegistrationFailed { .. },
            ) => (
                BootstrapState::Ready,
                vec![BootstrapAction::Commit {
                    result: AppBootstrapResult::logged_in(profile, permission),
                }],
            ),
            // Any step failure without a gentler degradation path commits
            // the safe default: both flags false, nobody logged in.
            (state, BootstrapEvent::StepFailed { .. }) if !state.is_terminal() => {
                let permission = state.permission().unwrap_or(PermissionStatus::Denied);
                (
                    BootstrapState::Failed,
                    vec![BootstrapAction::Commit {
                        result: AppBootstrapResult::logged_out(false, permission),
                    }],
                )
            }
            (state, event) => {
                warn!(?state, ?event, "ignored bootstrap event for current state");
                (state, Vec::new())
            }
        }
    }
}
