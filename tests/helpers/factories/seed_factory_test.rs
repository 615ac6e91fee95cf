use crate::test_helpers::factory::Factory;

#[test]
fn test_seed_factory_default_is_consistent() {
    let seed = Factory::seed().create();

    assert_eq!(seed.movies.len(), 4);
    assert_eq!(seed.theaters.len(), 2);
    assert_eq!(seed.reviews.len(), 3);
    assert!(seed.validate().is_ok());
}

#[test]
fn test_seed_factory_builders_append() {
    use crate::test_helpers::factories::seed_factory::{movie, theater};

    let seed = Factory::seed()
        .with_movie(movie(9, "Alien"))
        .with_theater(theater(9, "Bagdad"))
        .with_showing(9, 9, true)
        .create();

    assert_eq!(seed.movies.last().unwrap().title, "Alien");
    assert_eq!(seed.movies_theaters.len(), 5);
    assert!(seed.validate().is_ok());
}
