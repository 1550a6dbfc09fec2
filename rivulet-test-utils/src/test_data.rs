// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{animal::Animal, person::Person, plant::Plant};
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestData {
    Person(Person),
    Animal(Animal),
    Plant(Plant),
}

impl TestData {
    /// Age, leg count or height, whichever the variant carries.
    #[must_use]
    pub const fn measure(&self) -> u32 {
        match self {
            TestData::Person(p) => p.age,
            TestData::Animal(a) => a.legs,
            TestData::Plant(p) => p.height,
        }
    }

    #[must_use]
    pub const fn is_person(&self) -> bool {
        matches!(self, TestData::Person(_))
    }
}

impl Display for TestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestData::Person(p) => write!(f, "{p}"),
            TestData::Animal(a) => write!(f, "{a}"),
            TestData::Plant(p) => write!(f, "{p}"),
        }
    }
}

pub fn person_alice() -> TestData {
    TestData::Person(Person::new("Alice".to_string(), 25))
}

pub fn person_bob() -> TestData {
    TestData::Person(Person::new("Bob".to_string(), 30))
}

pub fn person_charlie() -> TestData {
    TestData::Person(Person::new("Charlie".to_string(), 35))
}

pub fn person_diane() -> TestData {
    TestData::Person(Person::new("Diane".to_string(), 40))
}

pub fn person_dave() -> TestData {
    TestData::Person(Person::new("Dave".to_string(), 28))
}

pub fn animal_dog() -> TestData {
    TestData::Animal(Animal::new("Dog".to_string(), 4))
}

pub fn animal_spider() -> TestData {
    TestData::Animal(Animal::new("Spider".to_string(), 8))
}

pub fn animal_bird() -> TestData {
    TestData::Animal(Animal::new("Bird".to_string(), 2))
}

pub fn animal_cat() -> TestData {
    TestData::Animal(Animal::new("Cat".to_string(), 4))
}

pub fn plant_rose() -> TestData {
    TestData::Plant(Plant::new("Rose".to_string(), 15))
}

pub fn plant_sunflower() -> TestData {
    TestData::Plant(Plant::new("Sunflower".to_string(), 180))
}

pub fn plant_oak() -> TestData {
    TestData::Plant(Plant::new("Oak".to_string(), 1000))
}

pub fn person(name: String, age: u32) -> TestData {
    TestData::Person(Person::new(name, age))
}

pub fn animal(name: String, legs: u32) -> TestData {
    TestData::Animal(Animal::new(name, legs))
}

pub fn plant(species: String, height: u32) -> TestData {
    TestData::Plant(Plant::new(species, height))
}
