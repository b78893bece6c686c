// SPDX-License-Identifier: MPL-2.0
//! View host port definition.
//!
//! The [`ViewHost`] is the scene graph that composites this view. It owns
//! the hosted video surface once registered, repaints on request and decides
//! what quitting means for the application.

use iced_core::{Point, Size};
use std::cell::RefCell;
use std::rc::Rc;

/// Key under which the hosted child view is registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildKey(pub u32);

impl ChildKey {
    /// The single key used for the video surface.
    pub const VIDEO: Self = Self(0);
}

/// Opaque token for a surface produced by the playback engine.
///
/// The host knows how to resolve it; this crate only hands it over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Port for the compositor hosting this view.
///
/// Implementations must not call back into the view synchronously from these
/// methods; the view may be mid-update when they run.
pub trait ViewHost {
    /// Registers a child view for `key`.
    fn add_child(&mut self, key: ChildKey, handle: SurfaceHandle);

    /// Parents the node hosting `key` under this view's composition node.
    fn attach_child_node(&mut self, key: ChildKey);

    /// Detaches the node hosting `key` and drops the host's reference to it.
    fn detach_child_node(&mut self, key: ChildKey);

    /// Tells the child view what size it should fill.
    fn set_child_properties(&mut self, key: ChildKey, size: Size);

    /// Moves the node hosting `key` to `origin` in view coordinates.
    fn set_child_origin(&mut self, key: ChildKey, origin: Point);

    /// Unregisters the child view for `key`.
    fn remove_child(&mut self, key: ChildKey);

    /// Requests a redraw. Cheap; the host coalesces repeated requests.
    fn invalidate_scene(&mut self);

    /// Asks the application to quit.
    fn request_quit(&mut self);
}

/// Lets a host be shared with code outside the view, such as an event loop
/// that also dispatches input.
impl<T: ViewHost + ?Sized> ViewHost for Rc<RefCell<T>> {
    fn add_child(&mut self, key: ChildKey, handle: SurfaceHandle) {
        self.borrow_mut().add_child(key, handle);
    }

    fn attach_child_node(&mut self, key: ChildKey) {
        self.borrow_mut().attach_child_node(key);
    }

    fn detach_child_node(&mut self, key: ChildKey) {
        self.borrow_mut().detach_child_node(key);
    }

    fn set_child_properties(&mut self, key: ChildKey, size: Size) {
        self.borrow_mut().set_child_properties(key, size);
    }

    fn set_child_origin(&mut self, key: ChildKey, origin: Point) {
        self.borrow_mut().set_child_origin(key, origin);
    }

    fn remove_child(&mut self, key: ChildKey) {
        self.borrow_mut().remove_child(key);
    }

    fn invalidate_scene(&mut self) {
        self.borrow_mut().invalidate_scene();
    }

    fn request_quit(&mut self) {
        self.borrow_mut().request_quit();
    }
}
