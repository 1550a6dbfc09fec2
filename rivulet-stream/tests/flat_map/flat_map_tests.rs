// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rivulet_core::{
    AnyPublisher, Completion, Demand, EraseExt, IntoPublisher, Never, PassthroughSubject,
    Publisher,
};
use rivulet_stream::prelude::*;
use rivulet_test_utils::RecordingSubscriber;
use std::sync::Arc;

#[test]
fn test_flat_map_flattens_inner_sequences() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![1, 2]
        .publisher()
        .flat_map(|n| vec![n * 10, n * 10 + 1].publisher())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![10, 11, 20, 21]);
    assert_eq!(recorder.completions(), vec![Completion::Finished]);
    Ok(())
}

#[test]
fn test_flat_map_inner_completion_does_not_end_siblings() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<u32>::new();
    let first = PassthroughSubject::<i32>::new();
    let second = PassthroughSubject::<i32>::new();
    let (a, b) = (first.clone(), second.clone());
    let recorder = RecordingSubscriber::<i32>::unlimited();
    outer
        .clone()
        .flat_map(move |n| -> AnyPublisher<i32, Never> {
            if n == 0 {
                a.clone().prefix(1).erase()
            } else {
                b.clone().erase()
            }
        })
        .subscribe(Arc::clone(&recorder));
    outer.send(0)?;
    outer.send(1)?;

    // Act
    first.send(10)?;
    first.send(11)?;
    second.send(20)?;
    second.send(21)?;

    // Assert
    assert_eq!(recorder.values(), vec![10, 20, 21]);
    assert!(!recorder.is_completed());
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(second.subscriber_count(), 1);
    Ok(())
}

#[test]
fn test_flat_map_finishes_after_outer_and_every_inner() -> anyhow::Result<()> {
    // Arrange
    let outer = PassthroughSubject::<u32>::new();
    let inner = PassthroughSubject::<i32>::new();
    let source = inner.clone();
    let recorder = RecordingSubscriber::<i32>::unlimited();
    outer
        .clone()
        .flat_map(move |_| source.clone())
        .subscribe(Arc::clone(&recorder));
    outer.send(0)?;

    // Act
    outer.finish()?;

    // Assert
    assert!(!recorder.is_completed());

    // Act
    inner.send(5)?;
    inner.finish()?;

    // Assert
    assert_eq!(recorder.values(), vec![5]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_flat_map_with_bounded_publishers() -> anyhow::Result<()> {
    // Arrange
    let inners: Vec<PassthroughSubject<i32>> = (0..3).map(|_| PassthroughSubject::new()).collect();
    let sources = inners.clone();
    let recorder = RecordingSubscriber::<i32>::unlimited();

    // Act
    vec![0_usize, 1, 2]
        .publisher()
        .flat_map_with(Demand::max(1), move |n| sources[n].clone())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(inners[0].subscriber_count(), 1);
    assert_eq!(inners[1].subscriber_count(), 0);

    // Act
    inners[0].send(1)?;
    inners[0].finish()?;

    // Assert
    assert_eq!(inners[1].subscriber_count(), 1);
    assert_eq!(inners[2].subscriber_count(), 0);

    // Act
    inners[1].send(2)?;
    inners[1].finish()?;
    inners[2].send(3)?;
    inners[2].finish()?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}

#[test]
fn test_flat_map_buffers_inner_values_for_slow_downstream() -> anyhow::Result<()> {
    // Arrange
    let recorder = RecordingSubscriber::<i32>::with_demand(Demand::max(1));

    // Act
    vec![1, 2]
        .publisher()
        .flat_map(|n| vec![n, n].publisher())
        .subscribe(Arc::clone(&recorder));

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(!recorder.is_completed());

    // Act
    recorder.request(Demand::max(3));

    // Assert
    assert_eq!(recorder.values(), vec![1, 1, 2, 2]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));
    Ok(())
}
