use std::sync::atomic::{AtomicU64, Ordering};

use color_adjust::{compose, thumbnail_transforms, Brightness, ColorTransform, FilterPreset};
use thiserror::Error;

use super::route::{RouteError, StepRoute};
use super::state::{PickMediaState, PostFlowState, Step};
use crate::error::{MediaError, PostError};
use crate::models::{FlowOptions, MediaRef, PostId, PostRequest};
use crate::services::PostService;

static NEXT_FLOW_ID: AtomicU64 = AtomicU64::new(1);

/// User actions, emitted by the screens and applied by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// Picker returned a reference, or nothing when the user cancelled
    MediaSelected(Option<MediaRef>),
    /// Camera or storage permission was denied
    MediaAccessDenied(String),
    /// "Next" on the picker
    ConfirmMedia,
    FilterSelected(FilterPreset),
    BrightnessChanged(Brightness),
    /// "Next" on the filter screen
    ConfirmAdjustments,
    CaptionChanged(String),
    LocationChanged(String),
    Back,
}

impl FlowEvent {
    /// Event for a media provider's answer.
    ///
    /// Only a permission denial becomes an inline warning; other provider
    /// failures are returned to the caller.
    pub fn from_pick(picked: Result<Option<MediaRef>, MediaError>) -> Result<Self, MediaError> {
        match picked {
            Ok(media) => Ok(FlowEvent::MediaSelected(media)),
            Err(e @ MediaError::PermissionDenied(_)) => Ok(FlowEvent::MediaAccessDenied(e.to_string())),
            Err(e) => Err(e),
        }
    }
}

/// An action the current state does not allow. Nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No media selected")]
    NoMediaSelected,

    #[error("Caption is empty")]
    EmptyCaption,

    #[error("A post is already being submitted")]
    SubmitInFlight,

    #[error("Action not available on this step")]
    WrongStep,
}

/// What applying an event did
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Moved to a different step
    Entered(Step),
    /// Same step, local state replaced
    Updated,
    Rejected(Rejection),
    /// A route could not be decoded; control is on `fallback` instead
    Abandoned { fallback: Step },
    /// Submission finished but failed; still on the caption step
    SubmitFailed,
    Posted(PostId),
    /// Flow cancelled by backing out of the first step
    Closed,
    /// Flow already finished, or a stale completion arrived
    Ignored,
}

/// Proof that a submission was started by a particular flow instance.
///
/// Completing with a ticket from a torn-down or re-entered flow is a no-op.
#[derive(Debug)]
pub struct SubmitTicket {
    flow_id: u64,
    generation: u64,
    request: PostRequest,
}

impl SubmitTicket {
    pub fn request(&self) -> &PostRequest {
        &self.request
    }
}

/// Owner of one posting flow.
///
/// Screens render from [`state`](Self::state) and send [`FlowEvent`]s to
/// [`apply`](Self::apply); they never mutate state directly.
#[derive(Debug)]
pub struct PostFlowController {
    id: u64,
    /// Bumped on every step change; invalidates outstanding submit tickets
    generation: u64,
    state: PostFlowState,
    options: FlowOptions,
}

impl PostFlowController {
    pub fn new(options: FlowOptions) -> Self {
        Self {
            id: NEXT_FLOW_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            state: PostFlowState::default(),
            options,
        }
    }

    /// Start a flow directly on the step a route names.
    pub fn from_route(route: &str, options: FlowOptions) -> Self {
        let mut controller = Self::new(options);
        controller.enter_route(route);
        controller
    }

    pub fn state(&self) -> &PostFlowState {
        &self.state
    }

    pub fn step(&self) -> Option<Step> {
        self.state.step()
    }

    /// Route of the current step, `None` once the flow has finished.
    pub fn route(&self) -> Option<StepRoute> {
        match &self.state {
            PostFlowState::PickMedia(_) => Some(StepRoute::PickMedia),
            PostFlowState::Adjust(s) => Some(StepRoute::FilterEdit {
                media: s.media.clone(),
            }),
            PostFlowState::Caption(s) => Some(StepRoute::CaptionDetails {
                media: s.media.clone(),
                filter: s.filter,
            }),
            PostFlowState::Posted { .. } | PostFlowState::Cancelled => None,
        }
    }

    pub fn can_confirm_media(&self) -> bool {
        matches!(&self.state, PostFlowState::PickMedia(s) if s.selection.is_some())
    }

    pub fn can_submit(&self) -> bool {
        matches!(&self.state, PostFlowState::Caption(s) if !s.posting && s.draft.is_submittable())
    }

    pub fn can_go_back(&self) -> bool {
        match &self.state {
            PostFlowState::Caption(s) => !s.posting,
            other => !other.is_finished(),
        }
    }

    /// Transform for the live preview on the filter step.
    pub fn preview_transform(&self) -> Option<ColorTransform> {
        match &self.state {
            PostFlowState::Adjust(s) => Some(compose(&s.adjustments)),
            _ => None,
        }
    }

    /// Static thumbnails for the filter picker, independent of brightness.
    pub fn thumbnails(&self) -> [(FilterPreset, ColorTransform); 5] {
        thumbnail_transforms()
    }

    pub fn apply(&mut self, event: FlowEvent) -> Transition {
        if self.state.is_finished() {
            tracing::debug!(?event, "Event on finished flow ignored");
            return Transition::Ignored;
        }

        match (&mut self.state, event) {
            (PostFlowState::PickMedia(s), FlowEvent::MediaSelected(Some(media))) => {
                s.selection = Some(media);
                s.access_warning = None;
                Transition::Updated
            }
            // Picker cancelled: keep whatever was selected before
            (PostFlowState::PickMedia(_), FlowEvent::MediaSelected(None)) => Transition::Updated,
            (PostFlowState::PickMedia(s), FlowEvent::MediaAccessDenied(message)) => {
                tracing::warn!(%message, "Media access denied");
                s.access_warning = Some(message);
                Transition::Updated
            }
            (PostFlowState::PickMedia(s), FlowEvent::ConfirmMedia) => match s.selection.clone() {
                Some(media) => self.move_to(PostFlowState::adjust(media)),
                None => Transition::Rejected(Rejection::NoMediaSelected),
            },
            (PostFlowState::PickMedia(_), FlowEvent::Back) => {
                self.cancel();
                Transition::Closed
            }

            (PostFlowState::Adjust(s), FlowEvent::FilterSelected(preset)) => {
                s.adjustments = s.adjustments.with_preset(preset);
                Transition::Updated
            }
            (PostFlowState::Adjust(s), FlowEvent::BrightnessChanged(brightness)) => {
                s.adjustments = s.adjustments.with_brightness(brightness);
                Transition::Updated
            }
            (PostFlowState::Adjust(s), FlowEvent::ConfirmAdjustments) => {
                let next = PostFlowState::caption(s.media.clone(), s.adjustments.preset);
                self.move_to(next)
            }
            (PostFlowState::Adjust(s), FlowEvent::Back) => {
                let media = s.media.clone();
                self.move_to(PostFlowState::PickMedia(PickMediaState {
                    selection: Some(media),
                    access_warning: None,
                }))
            }

            (PostFlowState::Caption(s), FlowEvent::CaptionChanged(text)) if !s.posting => {
                s.draft.caption = text;
                Transition::Updated
            }
            (PostFlowState::Caption(s), FlowEvent::LocationChanged(text)) if !s.posting => {
                s.draft.location = text;
                Transition::Updated
            }
            (PostFlowState::Caption(s), _) if s.posting => {
                Transition::Rejected(Rejection::SubmitInFlight)
            }
            // The chosen filter is not carried back: adjust restarts from defaults
            (PostFlowState::Caption(s), FlowEvent::Back) => {
                let media = s.media.clone();
                self.move_to(PostFlowState::adjust(media))
            }

            (_, event) => {
                tracing::debug!(?event, step = ?self.state.step(), "Event not valid on this step");
                Transition::Rejected(Rejection::WrongStep)
            }
        }
    }

    /// Validate the caption and enter the posting sub-state.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, Rejection> {
        let PostFlowState::Caption(s) = &mut self.state else {
            return Err(Rejection::WrongStep);
        };
        if s.posting {
            return Err(Rejection::SubmitInFlight);
        }
        if !s.draft.is_submittable() {
            return Err(Rejection::EmptyCaption);
        }

        let index = s.filter.index();
        let caption = if self.options.annotate_filter {
            format!("{} (Applied Filter: {index})", s.draft.caption)
        } else {
            s.draft.caption.clone()
        };
        let request = PostRequest {
            caption,
            media_url: s.media.as_str().to_string(),
            tags: s.draft.tags(&self.options.default_tags),
        };

        s.posting = true;
        s.notice = None;
        tracing::debug!(filter = index, media = %s.media, "Attempting to post");

        Ok(SubmitTicket {
            flow_id: self.id,
            generation: self.generation,
            request,
        })
    }

    /// Apply the outcome of a submission started with [`begin_submit`].
    ///
    /// [`begin_submit`]: Self::begin_submit
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<PostId, PostError>,
    ) -> Transition {
        let current = ticket.flow_id == self.id && ticket.generation == self.generation;
        let PostFlowState::Caption(s) = &mut self.state else {
            tracing::debug!("Submit completion for a finished flow ignored");
            return Transition::Ignored;
        };
        if !current || !s.posting {
            tracing::debug!("Stale submit completion ignored");
            return Transition::Ignored;
        }

        match result {
            Ok(post_id) => {
                tracing::info!(%post_id, "Post successful");
                self.state = PostFlowState::Posted {
                    post_id: post_id.clone(),
                };
                self.generation += 1;
                Transition::Posted(post_id)
            }
            Err(e) => {
                tracing::warn!(%e, "Post failed");
                s.posting = false;
                s.notice = Some("Post failed. Try again.".to_string());
                Transition::SubmitFailed
            }
        }
    }

    /// Submit the current caption and wait for the service.
    pub async fn submit(&mut self, service: &dyn PostService) -> Transition {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(rejection) => return Transition::Rejected(rejection),
        };
        let result = service.create_post(ticket.request()).await;
        self.complete_submit(ticket, result)
    }

    /// Decode a step route and enter it.
    ///
    /// A route that fails to decode is abandoned: control goes to the
    /// step before it and the failure is only logged. A finished flow
    /// stays finished.
    pub fn enter_route(&mut self, raw: &str) -> Transition {
        if self.state.is_finished() {
            tracing::debug!(route = raw, "Route entry on finished flow ignored");
            return Transition::Ignored;
        }
        match StepRoute::decode(raw) {
            Ok(route) => {
                let step = route_step(&route);
                if self.route().as_ref() == Some(&route) {
                    return Transition::Updated;
                }
                self.move_to(state_for(route));
                Transition::Entered(step)
            }
            Err(e) => self.abandon(raw, e),
        }
    }

    fn abandon(&mut self, raw: &str, error: RouteError) -> Transition {
        let fallback = error.fallback();
        let step = route_step(&fallback);
        tracing::warn!(route = raw, %error, fallback = %fallback, "Abandoning step entry");
        if self.step() != Some(step) {
            self.move_to(state_for(fallback));
        }
        Transition::Abandoned { fallback: step }
    }

    /// Tear the flow down. Any in-flight completion becomes a no-op.
    pub fn cancel(&mut self) {
        if !self.state.is_finished() {
            tracing::debug!(flow = self.id, "Post flow cancelled");
        }
        self.state = PostFlowState::Cancelled;
        self.generation += 1;
    }

    fn move_to(&mut self, next: PostFlowState) -> Transition {
        let step = next.step();
        self.state = next;
        self.generation += 1;
        match step {
            Some(step) => {
                tracing::debug!(?step, "Entered step");
                Transition::Entered(step)
            }
            None => Transition::Closed,
        }
    }
}

fn route_step(route: &StepRoute) -> Step {
    match route {
        StepRoute::PickMedia => Step::PickMedia,
        StepRoute::FilterEdit { .. } => Step::Adjust,
        StepRoute::CaptionDetails { .. } => Step::Caption,
    }
}

fn state_for(route: StepRoute) -> PostFlowState {
    match route {
        StepRoute::PickMedia => PostFlowState::default(),
        StepRoute::FilterEdit { media } => PostFlowState::adjust(media),
        StepRoute::CaptionDetails { media, filter } => PostFlowState::caption(media, filter),
    }
}
