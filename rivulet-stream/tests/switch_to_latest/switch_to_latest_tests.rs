// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{
    AnyPublisher, Completion, EraseExt, Never, PassthroughSubject, Publisher,
};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

type Inner = AnyPublisher<&'static str, Never>;

#[test]
fn test_switch_to_latest_forwards_only_newest_inner() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<Inner>::new();
    let first = PassthroughSubject::<&'static str>::new();
    let second = PassthroughSubject::<&'static str>::new();
    let recorder = RecordingSubscriber::<&str>::unlimited();
    outer
        .clone()
        .switch_to_latest()
        .subscribe(Arc::clone(&recorder));

    // Act
    outer.send(first.clone().erase())?;
    first.send("a")?;
    outer.send(second.clone().erase())?;
    first.send("stale")?;
    second.send("b")?;

    // Assert
    assert_eq!(recorder.values(), vec!["a", "b"]);
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(second.subscriber_count(), 1);
    Ok(())
}

#[test]
fn test_switch_to_latest_waits_for_current_inner_before_finishing() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<Inner>::new();
    let inner = PassthroughSubject::<&'static str>::new();
    let recorder = RecordingSubscriber::<&str>::unlimited();
    outer
        .clone()
        .switch_to_latest()
        .subscribe(Arc::clone(&recorder));
    outer.send(inner.clone().erase())?;

    // Act
    outer.finish()?;
    inner.send("still flowing")?;

    // Assert
    assert_eq!(recorder.values(), vec!["still flowing"]);
    assert!(!recorder.is_completed());

    // Act
    inner.finish()?;

    // Assert
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_switch_to_latest_finishes_with_outer_when_no_inner_active() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<Inner>::new();
    let inner = PassthroughSubject::<&'static str>::new();
    let recorder = RecordingSubscriber::<&str>::unlimited();
    outer
        .clone()
        .switch_to_latest()
        .subscribe(Arc::clone(&recorder));
    outer.send(inner.clone().erase())?;
    inner.finish()?;

    // Act
    outer.finish()?;

    // Assert
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_switch_to_latest_ignores_completion_of_replaced_inner() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<AnyPublisher<i32, &'static str>, &'static str>::new();
    let first = PassthroughSubject::<i32, &'static str>::new();
    let second = PassthroughSubject::<i32, &'static str>::new();
    let recorder = RecordingSubscriber::<i32, &str>::unlimited();
    outer
        .clone()
        .switch_to_latest()
        .subscribe(Arc::clone(&recorder));
    outer.send(first.clone().erase())?;
    outer.send(second.clone().erase())?;

    // Act
    first.send_completion(Completion::Failure("too late"))?;
    second.send(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![2]);
    assert!(!recorder.is_completed());

    // Act
    second.send_completion(Completion::Failure("boom"))?;

    // Assert
    assert_eq!(recorder.completions(), vec![Completion::Failure("boom")]);
    assert_eq!(outer.subscriber_count(), 0);
    Ok(())
}
