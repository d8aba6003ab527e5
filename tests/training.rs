use q_snake::game::GameConfig;
use q_snake::modes::{TrainConfig, TrainMode};
use q_snake::rl::{
    default_device, matrix, Experience, ReplayMemory, TrainingBackend, ValueNetwork,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn experience(reward: f32, done: bool) -> Experience<TrainingBackend> {
    let device = default_device();
    Experience {
        old_state: matrix::zeros(10, 10, &device),
        new_state: matrix::zeros(10, 10, &device),
        action: 2,
        reward,
        done,
    }
}

fn short_run(seed: u64) -> TrainConfig {
    TrainConfig {
        num_episodes: 4,
        log_frequency: 2,
        max_episode_steps: Some(300),
        seed: Some(seed),
        game_config: GameConfig::default(),
        ..Default::default()
    }
}

#[test]
fn replay_memory_evicts_oldest_first() {
    let mut memory = ReplayMemory::new(5);
    let mut evicted = Vec::new();

    for i in 0..12 {
        if let Some(old) = memory.push(experience(i as f32, false)) {
            evicted.push(old.reward);
        }
    }

    assert_eq!(memory.len(), 5);
    assert_eq!(evicted, (0..7).map(|i| i as f32).collect::<Vec<_>>());
    let kept: Vec<f32> = memory.iter_oldest_first().map(|e| e.reward).collect();
    assert_eq!(kept, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
}

#[test]
fn terminal_transition_targets_the_reward() {
    let device = default_device();
    let network =
        ValueNetwork::<TrainingBackend>::new(100, 48, &mut StdRng::seed_from_u64(5), &device);

    let target = network.bellman_target(&experience(-500.0, true), 0.3).unwrap();
    assert_eq!(target, -500.0);
}

#[test]
fn repeated_updates_fit_a_fixed_transition() {
    let device = default_device();
    let mut network =
        ValueNetwork::<TrainingBackend>::new(100, 48, &mut StdRng::seed_from_u64(8), &device);
    let mut transition = experience(5.0, true);
    transition.old_state = matrix::from_vec(
        (0..100).map(|i| if i % 7 == 0 { 1.0 } else { 0.0 }).collect(),
        10,
        10,
        &device,
    )
    .unwrap();

    let first = network.train_step(&transition, 0.3, 0.01).unwrap();
    let mut last = first;
    for _ in 0..50 {
        last = network.train_step(&transition, 0.3, 0.01).unwrap();
    }

    assert!(last < first, "loss went from {first} to {last}");
}

#[test]
fn seeded_training_run_completes() {
    let mut mode = TrainMode::<TrainingBackend>::new(short_run(21), default_device()).unwrap();

    mode.run().unwrap();

    let stats = mode.stats();
    assert_eq!(stats.total_episodes(), 4);
    assert!(stats.total_steps() >= 4);
    assert!(mode.memory().len() <= 1000);
    assert!(mode.epsilon() < 1.0);
    assert!(mode.epsilon() > 0.0);
}

#[test]
fn same_seed_gives_same_weights() {
    let device = default_device();
    let mut first = TrainMode::<TrainingBackend>::new(short_run(33), device.clone()).unwrap();
    let mut second = TrainMode::<TrainingBackend>::new(short_run(33), device).unwrap();

    first.run_training(2).unwrap();
    second.run_training(2).unwrap();

    assert_eq!(first.stats().total_steps(), second.stats().total_steps());
    assert_eq!(first.epsilon(), second.epsilon());

    let bits = |mode: &TrainMode<TrainingBackend>| -> Vec<u32> {
        matrix::to_vec(mode.network().w2())
            .unwrap()
            .into_iter()
            .map(f32::to_bits)
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}
