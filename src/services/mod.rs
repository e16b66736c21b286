pub mod proof_service;
