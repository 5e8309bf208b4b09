use color_adjust::{FilterPreset, ImageAdjustments};

use crate::models::{CaptionDraft, MediaRef, PostId};

/// The three screens of the posting flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PickMedia,
    Adjust,
    Caption,
}

/// Picker screen: current selection plus any permission warning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickMediaState {
    pub selection: Option<MediaRef>,
    /// Persistent inline warning after a camera/storage permission denial
    pub access_warning: Option<String>,
}

/// Filter and edit screen. Adjustments live only as long as this state.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustState {
    pub media: MediaRef,
    pub adjustments: ImageAdjustments,
}

/// Caption screen
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionState {
    pub media: MediaRef,
    pub filter: FilterPreset,
    pub draft: CaptionDraft,
    /// A submission is in flight; share and back are disabled
    pub posting: bool,
    /// Transient notice from the last failed submission
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostFlowState {
    PickMedia(PickMediaState),
    Adjust(AdjustState),
    Caption(CaptionState),
    /// Post created; control returns to the feed
    Posted { post_id: PostId },
    /// User backed out of the first step or the flow was torn down
    Cancelled,
}

impl PostFlowState {
    pub fn step(&self) -> Option<Step> {
        match self {
            PostFlowState::PickMedia(_) => Some(Step::PickMedia),
            PostFlowState::Adjust(_) => Some(Step::Adjust),
            PostFlowState::Caption(_) => Some(Step::Caption),
            PostFlowState::Posted { .. } | PostFlowState::Cancelled => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step().is_none()
    }

    /// Fresh adjust state: re-entering the step always starts from defaults.
    pub(crate) fn adjust(media: MediaRef) -> Self {
        PostFlowState::Adjust(AdjustState {
            media,
            adjustments: ImageAdjustments::default(),
        })
    }

    pub(crate) fn caption(media: MediaRef, filter: FilterPreset) -> Self {
        PostFlowState::Caption(CaptionState {
            media,
            filter,
            draft: CaptionDraft::default(),
            posting: false,
            notice: None,
        })
    }
}

impl Default for PostFlowState {
    fn default() -> Self {
        PostFlowState::PickMedia(PickMediaState::default())
    }
}
