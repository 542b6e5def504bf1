//! Planning and submission through `BraketBackend`.

mod common;

use std::sync::Arc;

use common::{ClassicalExecutor, MockTaskService, circuit_with_readout, set_shots, x};
use verbatim_adapter_braket::{
    BraketBackend, BraketConfig, BraketError, LimitKind, TaskRef, TaskService,
};
use verbatim_compile::DeviceFamily;
use verbatim_hal::ClassicalRegister;
use verbatim_ir::{Circuit, Operation};

fn remote_backend(config: BraketConfig) -> (Arc<MockTaskService>, BraketBackend) {
    let service = Arc::new(MockTaskService::instant().with_samples(vec![vec![1, 0]; 4]));
    let backend = BraketBackend::new(config, service.clone()).unwrap();
    (service, backend)
}

#[tokio::test]
async fn test_forced_family_on_local_simulator() {
    let circuit = circuit_with_readout(
        "ro",
        3,
        vec![
            x(0),
            x(1),
            x(2),
            Operation::PragmaRepeatedMeasurement {
                readout: "ro".into(),
                number_measurements: 2,
                qubit_mapping: None,
            },
        ],
    );
    let executor = Arc::new(ClassicalExecutor::new());
    let config = BraketConfig::for_device("braket_sv").with_forced_family(DeviceFamily::Oqc);
    let backend = BraketBackend::local(config, executor.clone()).unwrap();

    let registers = backend.run_circuit(&circuit).await.unwrap();

    assert_eq!(registers.bit["ro"], vec![vec![true, true, true]; 2]);
    assert!(registers.float.is_empty());
    assert!(registers.complex.is_empty());
    assert_eq!(executor.executions(), 1);
}

#[tokio::test]
async fn test_length_limit_blocks_submission() {
    let circuit = Circuit::from_operations([x(0), x(1), x(2)]).unwrap();
    let config = BraketConfig::for_device("sv1")
        .with_forced_family(DeviceFamily::Rigetti)
        .with_max_circuit_length(2);
    let (service, backend) = remote_backend(config);

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(
        err,
        BraketError::LimitExceeded {
            kind: LimitKind::Length,
            requested: 3,
            limit: 2
        }
    ));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_shot_limit_checked_before_length() {
    let circuit = circuit_with_readout("ro", 1, vec![x(0), x(0), set_shots(500, "ro")]);
    let config = BraketConfig::for_device("forte")
        .with_allow_hardware(true)
        .with_max_shots(100)
        .with_max_circuit_length(1);
    let (service, backend) = remote_backend(config);

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(
        err,
        BraketError::LimitExceeded {
            kind: LimitKind::Shots,
            requested: 500,
            limit: 100
        }
    ));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_ambiguous_measurement_blocks_submission() {
    let circuit = circuit_with_readout(
        "ro",
        1,
        vec![x(0), set_shots(10, "ro"), set_shots(20, "ro")],
    );
    let (service, backend) = remote_backend(BraketConfig::for_device("sv1"));

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(err, BraketError::AmbiguousMeasurement { count: 2 }));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_hardware_refused_without_opt_in() {
    let circuit = Circuit::from_operations([x(0)]).unwrap();
    let (service, backend) = remote_backend(BraketConfig::for_device("garnet"));

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(err, BraketError::DeviceNotAllowed(name) if name == "garnet"));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_verbatim_mode_without_family_is_refused() {
    let circuit = Circuit::from_operations([x(0)]).unwrap();
    let config = BraketConfig::for_device("sv1").with_verbatim_mode(true);
    let (service, backend) = remote_backend(config);

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(err, BraketError::NoVerbatimTranslator(_)));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_unsupported_gate_names_family() {
    let circuit = Circuit::from_operations([Operation::Hadamard { qubit: 0 }]).unwrap();
    let config = BraketConfig::for_device("sv1").with_forced_family(DeviceFamily::IonQ);
    let (service, backend) = remote_backend(config);

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(
        err,
        BraketError::UnsupportedOperation { tag, family } if tag == "Hadamard" && family == "ionq"
    ));
    assert_eq!(service.submits(), 0);
}

#[tokio::test]
async fn test_remote_submission_carries_shots_and_source() {
    let circuit = circuit_with_readout("ro", 2, vec![x(0), set_shots(4, "ro")]);
    let (service, backend) = remote_backend(BraketConfig::for_device("sv1"));

    let registers = backend.run_circuit(&circuit).await.unwrap();

    let submitted = service.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].shots, 4);
    assert!(submitted[0].device.ends_with("sv1"));
    assert!(submitted[0].source.starts_with("OPENQASM 3.0;"));
    assert_eq!(registers.bit["ro"], vec![vec![true, false]; 4]);
}

#[tokio::test]
async fn test_verbatim_submission_uses_box() {
    let circuit = circuit_with_readout("ro", 1, vec![x(0), set_shots(4, "ro")]);
    let config = BraketConfig::for_device("sv1").with_forced_family(DeviceFamily::Oqc);
    let (service, backend) = remote_backend(config);

    backend.run_circuit_queued(&circuit).await.unwrap();

    let source = &service.submitted()[0].source;
    assert!(source.contains("#pragma braket verbatim"));
}

#[tokio::test]
async fn test_input_bits_pad_rows() {
    let circuit = circuit_with_readout(
        "ro",
        4,
        vec![
            x(0),
            set_shots(3, "ro"),
            Operation::InputBit {
                name: "ro".into(),
                index: 2,
                value: true,
            },
            Operation::InputBit {
                name: "ro".into(),
                index: 3,
                value: false,
            },
        ],
    );
    let service =
        Arc::new(MockTaskService::instant().with_samples(vec![vec![1, 0], vec![0, 1], vec![1, 1]]));
    let backend = BraketBackend::new(BraketConfig::for_device("sv1"), service).unwrap();

    let registers = backend.run_circuit(&circuit).await.unwrap();

    assert_eq!(
        registers.bit["ro"],
        vec![
            vec![true, false, true, false],
            vec![false, true, true, false],
            vec![true, true, true, false],
        ]
    );
}

#[tokio::test]
async fn test_float_and_complex_outputs_reach_registers() {
    let circuit = circuit_with_readout(
        "ro",
        2,
        vec![
            Operation::DefinitionFloat {
                name: "angles".into(),
                length: 2,
                is_output: true,
            },
            Operation::DefinitionComplex {
                name: "amplitudes".into(),
                length: 1,
                is_output: true,
            },
            x(0),
            set_shots(4, "ro"),
        ],
    );

    for config in [
        BraketConfig::for_device("sv1"),
        BraketConfig::for_device("sv1").with_forced_family(DeviceFamily::Oqc),
    ] {
        let (service, backend) = remote_backend(config);

        let registers = backend.run_circuit(&circuit).await.unwrap();

        assert_eq!(service.submits(), 1);
        assert_eq!(registers.bit["ro"], vec![vec![true, false]; 4]);
        assert!(registers.float["angles"].is_empty());
        assert!(registers.complex["amplitudes"].is_empty());
    }
}

#[tokio::test]
async fn test_batch_mode_submits_once() {
    let circuits = vec![
        circuit_with_readout("a", 1, vec![x(0), set_shots(4, "a")]),
        circuit_with_readout("b", 1, vec![x(0), set_shots(4, "b")]),
        circuit_with_readout("c", 1, vec![x(0), set_shots(4, "c")]),
    ];
    let config = BraketConfig::for_device("sv1").with_batch_mode(true);
    let (service, backend) = remote_backend(config);

    let runs = backend.run_circuits_queued(&circuits).await.unwrap();

    assert_eq!(runs.len(), 3);
    assert_eq!(service.batch_submits(), 1);
    assert_eq!(service.submits(), 0);
    assert!(runs.iter().all(|run| matches!(run.task(), TaskRef::Remote(_))));
}

#[tokio::test]
async fn test_batch_requires_equal_shots() {
    let circuits = vec![
        circuit_with_readout("a", 1, vec![x(0), set_shots(4, "a")]),
        circuit_with_readout("b", 1, vec![x(0), set_shots(8, "b")]),
    ];
    let config = BraketConfig::for_device("sv1").with_batch_mode(true);
    let (service, backend) = remote_backend(config);

    let err = backend.run_circuits_queued(&circuits).await.unwrap_err();

    assert!(matches!(err, BraketError::HeterogeneousShots { shots } if shots == vec![4, 8]));
    assert_eq!(service.batch_submits(), 0);
}

#[tokio::test]
async fn test_constant_circuit_prefixes_submissions() {
    let constant = Circuit::from_operations([x(0)]).unwrap();
    let measurement = ClassicalRegister::new(
        Some(constant),
        vec![
            circuit_with_readout("a", 1, vec![set_shots(4, "a")]),
            circuit_with_readout("b", 1, vec![set_shots(4, "b")]),
        ],
    );
    let (service, backend) = remote_backend(BraketConfig::for_device("sv1"));

    let registers = backend.run_measurement_registers(&measurement).await.unwrap();

    let submitted = service.submitted();
    assert_eq!(submitted.len(), 2);
    assert!(submitted.iter().all(|r| r.source.contains("x q[0];")));
    assert!(registers.bit.contains_key("a"));
    assert!(registers.bit.contains_key("b"));
}

#[tokio::test]
async fn test_local_runs_never_touch_service() {
    let executor = Arc::new(ClassicalExecutor::new());
    let service = Arc::new(MockTaskService::new());
    let backend = BraketBackend::new(BraketConfig::for_device("local:classical"), service.clone())
        .unwrap()
        .with_local_executor(executor);
    let circuit = circuit_with_readout("ro", 1, vec![x(0), set_shots(2, "ro")]);

    let mut run = backend.run_circuit_queued(&circuit).await.unwrap();
    assert!(run.is_resolved());
    let registers = run.poll(backend.service()).await.unwrap().unwrap();

    assert_eq!(registers.bit["ro"], vec![vec![true]; 2]);
    assert_eq!(service.submits(), 0);
    assert_eq!(service.state_queries(), 0);
    assert_eq!(service.fetches(), 0);
    assert_eq!(backend.service().name(), "mock");
}

#[tokio::test]
async fn test_local_device_without_executor() {
    let (_, backend) = remote_backend(BraketConfig::for_device("braket_dm"));
    let circuit = Circuit::from_operations([x(0)]).unwrap();

    let err = backend.run_circuit_queued(&circuit).await.unwrap_err();

    assert!(matches!(err, BraketError::LocalSimulatorUnavailable(name) if name == "braket_dm"));
}
