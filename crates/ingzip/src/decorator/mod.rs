//! Building middleware chains out of handlers.
//!
//! A [`Decorator`] takes a handler and returns another one that wraps it. Decorators
//! compose with [`DecoratorExt::and_then`]: the decorator added last ends up outermost
//! and sees the request first.

mod decorator_composer;
mod identity;

pub use decorator_composer::DecoratorComposer;
pub use identity::IdentityDecorator;

pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}

/// Chaining helpers for the decorators of this crate.
pub trait DecoratorExt: Sized {
    /// Wraps the output of `self` with `decorator`.
    fn and_then<D>(self, decorator: D) -> DecoratorComposer<Self, D> {
        DecoratorComposer::new(self, decorator)
    }

    /// Wraps the output of `decorator` with `self`.
    fn compose<D>(self, decorator: D) -> DecoratorComposer<D, Self> {
        DecoratorComposer::new(decorator, self)
    }
}

impl DecoratorExt for IdentityDecorator {}

impl<D1, D2> DecoratorExt for DecoratorComposer<D1, D2> {}
