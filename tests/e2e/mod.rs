mod fixture_tests;
mod helpers;
mod scenarios;
