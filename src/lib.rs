#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

pub mod component;
pub mod config;
pub mod dispatch;
pub mod element;
pub mod id;
pub mod logging;
pub mod tags;

#[cfg(test)]
mod tests;

#[doc(inline)]
pub use component::{Component, Handle, Rendered, Scope};
#[doc(inline)]
pub use element::{Arg, Attributes, IntoArgs, create_element};
pub use sprig_core as dom;
#[doc(inline)]
pub use sprig_core::{Document, Element, Error, Event, Listener, Node, Result, Text, listener};

pub mod prelude {
    //! Everything needed to build elements and components.
    //!
    //! ```rust
    //! use sprig::prelude::*;
    //!
    //! # fn main() -> sprig::Result<()> {
    //! let list = ul((li("one")?, li("two")?))?;
    //! assert_eq!(list.child_count(), 2);
    //! # Ok(())
    //! # }
    //! ```
    pub use crate::attrs;
    pub use crate::component::{
        AnyComponent, Component, Handle, Lifecycle, Rendered, Scope, WeakHandle,
    };
    pub use crate::dispatch::{dispatch, dispatch_with_detail};
    pub use crate::element::{Arg, AttrValue, Attributes, IntoArgs, create_element};
    pub use crate::tags::*;
    pub use sprig_core::{Document, Element, Event, Listener, Node, Text, listener};
}
