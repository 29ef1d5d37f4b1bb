//! Conflict-aware rescheduling through a genetic search.
//!
//! Inserting a new event into a booked calendar can double-book resources or
//! executors. The scheduler evolves candidate assignments that displace the
//! lower-priority side of each collision, scoring candidates by weighted
//! conflict penalties plus drift from originally requested times. The search
//! is heuristic: it minimizes, it does not guarantee a conflict-free result.

use std::cmp::Ordering;

use chrono::{Duration, Timelike};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::schedule::ScheduleDraft;
use crate::services::conflict::{check_conflicts, collides};
use crate::services::schedule_utils;

/// Displaced events must keep both endpoints inside working hours.
pub const WORK_DAY_START_HOUR: u32 = 8;
pub const WORK_DAY_END_HOUR: u32 = 22;

/// Random placements start no later than this hour.
const PLACEMENT_HOUR_MAX: u32 = 19;
const PLACEMENT_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// One complete hypothetical assignment: the existing events in their input
/// order, the new event last. Individuals own independent copies of every
/// event; no structure is shared across the population.
pub type Individual = Vec<ScheduleDraft>;

/// Knobs for the generational loop.
#[derive(Debug, Clone)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    /// Stop after this many consecutive generations without improvement.
    pub stall_generations: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_generations: 50,
            mutation_rate: 0.2,
            stall_generations: 5,
        }
    }
}

/// Score one assignment. 0 is the only perfect score; everything else is
/// negative, more negative is worse.
///
/// The conflict weight depends on the pair's list positions (10 when the
/// first-listed event outranks the second, 1 the other way around, 5 on a
/// tie), not on a symmetric rule over which side ranks lower.
pub fn fitness(individual: &[ScheduleDraft]) -> f64 {
    let mut conflict_penalty: u64 = 0;
    for i in 0..individual.len() {
        for j in (i + 1)..individual.len() {
            let first = &individual[i];
            let second = &individual[j];
            if collides(first, second) {
                conflict_penalty += match first.priority.cmp(&second.priority) {
                    Ordering::Greater => 10,
                    Ordering::Less => 1,
                    Ordering::Equal => 5,
                };
            }
        }
    }

    let mut drift_penalty = 0.0;
    for event in individual {
        if let Some(original) = event.original_start_at {
            let moved = schedule_utils::duration_minutes(original, event.start_at).abs() as f64;
            drift_penalty += moved / 15.0;
        }
    }

    -(conflict_penalty as f64 * 100.0 + drift_penalty)
}

/// Build the initial population for inserting `new_event` among `existing`.
///
/// The new event's requested start is recorded as its `original_start_at`.
/// Each trial clones every event and walks the existing ones in order: when
/// one collides with the (possibly already adjusted) new event, the lower
/// priority side is displaced to a random slot on its own day.
pub fn initialize_population<R: Rng>(
    rng: &mut R,
    existing: &[ScheduleDraft],
    new_event: &ScheduleDraft,
    population_size: usize,
) -> Vec<Individual> {
    let mut template = new_event.clone();
    template.original_start_at = Some(template.start_at);

    let mut population = Vec::with_capacity(population_size);
    for _ in 0..population_size {
        let mut individual: Individual = Vec::with_capacity(existing.len() + 1);
        let mut adjusted_new = template.clone();

        for event in existing {
            let mut copy = event.clone();
            if !check_conflicts(std::slice::from_ref(&adjusted_new), &copy).is_empty() {
                if copy.priority < adjusted_new.priority {
                    copy.original_start_at = Some(copy.start_at);
                    displace_randomly(rng, &mut copy);
                } else {
                    displace_randomly(rng, &mut adjusted_new);
                }
            }
            individual.push(copy);
        }

        individual.push(adjusted_new);
        population.push(individual);
    }
    population
}

/// Move an event to a random quarter-hour slot on its own day, keeping its
/// duration.
fn displace_randomly<R: Rng>(rng: &mut R, event: &mut ScheduleDraft) {
    let duration = event.duration();
    let hour = rng.gen_range(WORK_DAY_START_HOUR..=PLACEMENT_HOUR_MAX);
    let minute = *PLACEMENT_MINUTES
        .choose(rng)
        .expect("minute grid is non-empty");
    let start = event
        .start_at
        .date()
        .and_hms_opt(hour, minute, 0)
        .expect("working-hours clock must be valid");
    event.start_at = start;
    event.end_at = start + duration;
}

/// Fitness-proportionate selection: shift all scores just past the minimum so
/// weights are strictly positive while preserving rank order, then draw two
/// parents with replacement.
fn select_parents<'a, R: Rng>(
    rng: &mut R,
    population: &'a [Individual],
    scores: &[f64],
) -> (&'a Individual, &'a Individual) {
    let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = scores.iter().map(|score| score - min_score + 1.0).collect();
    let sampler = WeightedIndex::new(&weights).expect("weights are strictly positive");
    (
        &population[sampler.sample(rng)],
        &population[sampler.sample(rng)],
    )
}

/// Single-point crossover: swap tails at a random cut. Single-slot
/// individuals have no interior cut point and pass through unchanged.
fn crossover<R: Rng>(
    rng: &mut R,
    first: &Individual,
    second: &Individual,
) -> (Individual, Individual) {
    let len = first.len();
    if len < 2 {
        return (first.clone(), second.clone());
    }
    let cut = rng.gen_range(1..len);

    let mut child_a = first[..cut].to_vec();
    child_a.extend_from_slice(&second[cut..]);
    let mut child_b = second[..cut].to_vec();
    child_b.extend_from_slice(&first[cut..]);
    (child_a, child_b)
}

/// Shift displaced events by up to an hour in either direction. A shift that
/// would leave either endpoint's hour outside the working window is discarded
/// silently for that event.
fn mutate<R: Rng>(rng: &mut R, individual: &mut Individual, mutation_rate: f64) {
    for event in individual.iter_mut() {
        if event.original_start_at.is_none() || rng.gen::<f64>() >= mutation_rate {
            continue;
        }

        let shift = Duration::minutes(rng.gen_range(-60..=60));
        let new_start = event.start_at + shift;
        let new_end = event.end_at + shift;
        let window = WORK_DAY_START_HOUR..WORK_DAY_END_HOUR;
        if window.contains(&new_start.hour()) && window.contains(&new_end.hour()) {
            event.start_at = new_start;
            event.end_at = new_end;
        }
    }
}

pub struct GeneticScheduler {
    config: GeneticConfig,
    seed: u64,
}

impl Default for GeneticScheduler {
    fn default() -> Self {
        Self::new(GeneticConfig::default(), None)
    }
}

impl GeneticScheduler {
    pub fn new(config: GeneticConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or(42);
        Self { config, seed }
    }

    /// Search for a low-conflict assignment that inserts `new_event` among
    /// `existing`.
    ///
    /// Always returns a usable assignment of `existing.len() + 1` events:
    /// existing events first in their input order, the new event last. The
    /// caller diffs the result against persisted identifiers: a known id
    /// whose times changed is an update, an event without one is an insert.
    pub fn resolve(
        &self,
        existing: &[ScheduleDraft],
        new_event: &ScheduleDraft,
    ) -> AppResult<Vec<ScheduleDraft>> {
        if new_event.executor.trim().is_empty() {
            return Err(AppError::validation("执行人不能为空"));
        }
        schedule_utils::ensure_window(new_event.start_at, new_event.end_at)?;
        if self.config.population_size < 2 {
            return Err(AppError::validation("种群规模至少为 2"));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut population =
            initialize_population(&mut rng, existing, new_event, self.config.population_size);

        let mut best_individual: Option<Individual> = None;
        let mut best_fitness = f64::NEG_INFINITY;
        let mut stalled = 0usize;

        for generation in 0..self.config.max_generations {
            let scores: Vec<f64> = population.iter().map(|ind| fitness(ind)).collect();

            let mut best_index = 0;
            let mut generation_best = f64::NEG_INFINITY;
            for (index, score) in scores.iter().copied().enumerate() {
                if score > generation_best {
                    generation_best = score;
                    best_index = index;
                }
            }

            if generation_best > best_fitness {
                best_fitness = generation_best;
                best_individual = Some(population[best_index].clone());
                stalled = 0;
            } else {
                stalled += 1;
            }

            if best_fitness >= 0.0 || stalled >= self.config.stall_generations {
                debug!(generation, best_fitness, "search stopped early");
                break;
            }

            let mut next_population: Vec<Individual> =
                Vec::with_capacity(self.config.population_size);
            for _ in 0..population.len() / 2 {
                let (first, second) = select_parents(&mut rng, &population, &scores);
                let (mut child_a, mut child_b) = crossover(&mut rng, first, second);
                mutate(&mut rng, &mut child_a, self.config.mutation_rate);
                mutate(&mut rng, &mut child_b, self.config.mutation_rate);
                next_population.push(child_a);
                next_population.push(child_b);
            }

            // Freshly bred children rarely reproduce the best candidate
            // exactly, so this reinsertion fires nearly every generation.
            if let Some(best) = &best_individual {
                if !next_population.iter().any(|candidate| candidate == best) {
                    next_population[0] = best.clone();
                }
            }

            population = next_population;
        }

        info!(
            best_fitness,
            events = existing.len() + 1,
            "schedule optimization finished"
        );

        Ok(best_individual.unwrap_or_else(|| {
            population
                .into_iter()
                .next()
                .expect("population is never empty")
        }))
    }
}
