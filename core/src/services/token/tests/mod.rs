#[cfg(test)]
mod mocks;
#[cfg(test)]
mod service_tests;
