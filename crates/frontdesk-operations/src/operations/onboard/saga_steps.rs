use std::marker::PhantomData;

use frontdesk_backend::StoreError;
use frontdesk_core::{LoginAddress, NewDoctor, Role};
use frontdesk_saga::SagaStep;
use tracing::debug;

use super::context::OnboardSagaContext;
use super::saga_data::{
    DoctorInserted, GeneratedIdentifiers, IdentityResolved, OnboardDoctorInput, PositionAllocated,
};
use crate::OperationError;
use crate::operations::identifiers::{
    derive_login_base, new_business_identifier, next_login_address,
};
use crate::operations::{ProfileAttributes, SequenceAllocator};
use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository};

macro_rules! onboard_step {
    ($name:ident) => {
        pub struct $name<I, P, D> {
            _marker: PhantomData<(I, P, D)>,
        }

        impl<I, P, D> $name<I, P, D> {
            #[must_use]
            pub fn new() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }

        impl<I, P, D> Default for $name<I, P, D> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

onboard_step!(GenerateIdentifiersStep);
onboard_step!(ResolveIdentityStep);
onboard_step!(AllocateSequenceStep);
onboard_step!(InsertDoctorStep);

impl<I, P, D> SagaStep for GenerateIdentifiersStep<I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    type Input = OnboardDoctorInput;
    type Output = GeneratedIdentifiers;
    type Context = OnboardSagaContext<I, P, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "generate_identifiers"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let config = ctx.config();
        let doctor_code = new_business_identifier(config.doctor_code_prefix(), ctx.clock());
        let employee_code = new_business_identifier(config.employee_code_prefix(), ctx.clock());

        let supplied = input
            .login_address
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty());
        let address = match supplied {
            Some(raw) => LoginAddress::parse(raw).map_err(OperationError::InvalidLoginAddress)?,
            None => {
                let base = derive_login_base(&input.full_name, config.fallback_login_token());
                let existing = ctx.profiles().addresses_with_prefix(
                    &base,
                    config.login_domain(),
                    config.address_scan_limit(),
                )?;
                next_login_address(&base, config.login_domain(), &existing)
                    .map_err(OperationError::InvalidLoginAddress)?
            }
        };

        debug!(
            doctor_code = %doctor_code,
            employee_code = %employee_code,
            address = %address,
            synthesized = supplied.is_none(),
            "generated identifiers"
        );
        Ok(GeneratedIdentifiers {
            input,
            doctor_code,
            employee_code,
            address,
        })
    }
}

impl<I, P, D> SagaStep for ResolveIdentityStep<I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    type Input = GeneratedIdentifiers;
    type Output = IdentityResolved;
    type Context = OnboardSagaContext<I, P, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "resolve_identity"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let attributes = ProfileAttributes {
            full_name: input.input.full_name.clone(),
            address: input.address.clone(),
            phone: input
                .input
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(str::to_string),
            role: Role::Doctor,
            employee_code: Some(input.employee_code.clone()),
        };
        let resolved = ctx.resolver().resolve(&attributes)?;
        Ok(IdentityResolved {
            created_by_this_run: !resolved.was_preexisting,
            identifiers: input,
            resolved,
        })
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        if !output.created_by_this_run {
            debug!(
                identity = %output.resolved.identity,
                "identity existed before this run, leaving it in place"
            );
            return Ok(());
        }
        ctx.resolver().release(&output.resolved)
    }

    fn compensation_description(&self) -> String {
        "delete the profile and identity created by this run".to_string()
    }
}

impl<I, P, D> SagaStep for AllocateSequenceStep<I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    type Input = IdentityResolved;
    type Output = PositionAllocated;
    type Context = OnboardSagaContext<I, P, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "allocate_sequence"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let position = SequenceAllocator::new(ctx.doctors()).next_position()?;
        Ok(PositionAllocated {
            identity: input,
            position,
        })
    }
}

impl<I, P, D> SagaStep for InsertDoctorStep<I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    type Input = PositionAllocated;
    type Output = DoctorInserted;
    type Context = OnboardSagaContext<I, P, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "insert_doctor"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let identifiers = &input.identity.identifiers;
        let resolved = &input.identity.resolved;
        let max_attempts = ctx.config().sequence_attempts();
        let mut position = input.position;

        for attempt in 1..=max_attempts {
            let new_doctor = NewDoctor {
                doctor_code: identifiers.doctor_code.clone(),
                user_id: resolved.identity.clone(),
                profile_id: resolved.profile.id.clone(),
                specialization: identifiers.input.specialization.clone(),
                qualification: identifiers.input.qualification.clone(),
                registration_number: identifiers.input.registration_number.clone(),
                consultation_fee: identifiers.input.consultation_fee,
                sessions: identifiers.input.sessions.clone(),
                sort_order: position,
            };
            match ctx.doctors().insert_doctor(new_doctor) {
                Ok(doctor) => {
                    return Ok(DoctorInserted {
                        profile: resolved.profile.clone(),
                        doctor,
                        reused_profile: !input.identity.created_by_this_run,
                        attempts: attempt,
                    });
                }
                Err(err) if err.is_unique_violation() && err.names_column("sort_order") => {
                    debug!(attempt, position = %position, "sort position taken, trying the next one");
                    if attempt < max_attempts {
                        position = position.next();
                    }
                }
                Err(err) => return Err(classify_insert_error(err, identifiers)),
            }
        }

        Err(OperationError::SequencePositionConflict {
            attempts: max_attempts,
            last_position: position,
        })
    }
}

fn classify_insert_error(err: StoreError, identifiers: &GeneratedIdentifiers) -> OperationError {
    if err.is_foreign_key_violation() {
        return OperationError::DomainRecordForeignKeyInvalid(err);
    }
    if err.is_unique_violation() && err.names_column("registration_number") {
        let registration_number = err
            .conflicting_value()
            .map(str::to_string)
            .or_else(|| identifiers.input.registration_number.clone())
            .unwrap_or_default();
        return OperationError::DuplicateLicenseNumber {
            registration_number,
        };
    }
    OperationError::DomainRecordInsertFailed(err)
}
